//! Text composition.

use crate::coercion::{CoercionContext, Coercer};
use crate::node::NodeAccess;
use crate::spec::Spec;

/// Concatenate the data of the node's immediate text runs.
///
/// Each run is trimmed on its own when the effective text trim flag is
/// set, so `" a "` followed by CDATA `" b "` composes to `"ab"`.
pub fn compose_text<N: NodeAccess>(node: &N, spec: &Spec) -> String {
    let trim = Coercer::new(spec).trim(CoercionContext::TextNodes);
    node.text_runs()
        .into_iter()
        .map(|run| if trim { run.trim() } else { run })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{presets, Labels};
    use crate::xml::Document;

    const PATTERN: &str =
        "<Pattern> SOME-RAW-TEXT <![CDATA[ .SOME-CDATA-TEXT ]]> </Pattern>";

    #[test]
    fn test_runs_trimmed_individually() {
        let doc = Document::parse(PATTERN).unwrap();
        let text = compose_text(&doc.root_element(), &presets::default_spec());
        assert_eq!(text, "SOME-RAW-TEXT.SOME-CDATA-TEXT");
    }

    #[test]
    fn test_trim_disabled_by_legacy_flag() {
        let doc = Document::parse(PATTERN).unwrap();
        let mut spec = Spec::new(Labels::default());
        spec.trim = Some(false);
        let text = compose_text(&doc.root_element(), &spec);
        assert_eq!(text, " SOME-RAW-TEXT  .SOME-CDATA-TEXT  ");
    }

    #[test]
    fn test_comments_are_included() {
        let doc = Document::parse("<A>x<!-- y -->z</A>").unwrap();
        let text = compose_text(&doc.root_element(), &presets::raw_spec());
        assert_eq!(text, "xyz");
    }

    #[test]
    fn test_no_text() {
        let doc = Document::parse("<A><B/></A>").unwrap();
        assert_eq!(compose_text(&doc.root_element(), &presets::raw_spec()), "");
    }
}
