use crate::message::EvidenceBundle;
use crate::normalize::{prepare_display, DisplayValue};
use serde::Serialize;
use serde_json::{json, Value};

/// The two collapsible panels an assistant turn may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PanelKind {
    RetrievedDocuments,
    RankedIds,
}

impl PanelKind {
    pub fn title(&self) -> &'static str {
        match self {
            Self::RetrievedDocuments => "See retrieved documents",
            Self::RankedIds => "See most relevant document ids",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvidencePanel {
    pub kind: PanelKind,
    pub body: DisplayValue,
    /// Panels start collapsed; the host toggles them.
    pub collapsed: bool,
}

/// Which panels a bundle opens. The two gates are independent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvidenceGates {
    pub documents: bool,
    pub ranked_ids: bool,
}

impl EvidenceGates {
    pub fn from_bundle(bundle: &EvidenceBundle) -> Self {
        let retrieved = bundle
            .retrieved
            .as_ref()
            .is_some_and(|docs| !docs.is_empty());
        let ranked = bundle
            .reranked_ids
            .as_ref()
            .is_some_and(|ids| !ids.is_empty());
        Self {
            documents: retrieved || bundle.retrieval_raw.is_some(),
            ranked_ids: ranked,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.documents && !self.ranked_ids
    }
}

/// Payload for the documents panel: the raw retrieval result when present,
/// otherwise `{"documents": retrieved}` with a missing list read as empty.
pub fn documents_panel_payload(
    retrieval_raw: Option<&Value>,
    retrieved: Option<&[Vec<String>]>,
) -> Value {
    match retrieval_raw {
        Some(raw) => raw.clone(),
        None => json!({ "documents": retrieved.unwrap_or_default() }),
    }
}

/// Panels for an assistant bundle, documents first.
pub fn evidence_panels(bundle: &EvidenceBundle, show_array_indexes: bool) -> Vec<EvidencePanel> {
    let gates = EvidenceGates::from_bundle(bundle);
    if gates.is_empty() {
        return Vec::new();
    }
    let mut panels = Vec::with_capacity(2);

    if gates.documents {
        let payload = documents_panel_payload(
            bundle.retrieval_raw.as_ref(),
            bundle.retrieved.as_deref(),
        );
        panels.push(EvidencePanel {
            kind: PanelKind::RetrievedDocuments,
            body: prepare_display(&payload, show_array_indexes),
            collapsed: true,
        });
    }

    if gates.ranked_ids {
        let ids = json!(bundle.reranked_ids.as_deref().unwrap_or_default());
        panels.push(EvidencePanel {
            kind: PanelKind::RankedIds,
            body: prepare_display(&ids, show_array_indexes),
            collapsed: true,
        });
    }

    panels
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|row| row.iter().map(|s| s.to_string()).collect())
            .collect()
    }

    #[test]
    fn payload_prefers_raw_result() {
        let raw = json!({ "foo": [1, 2] });
        let retrieved = docs(&[]);
        assert_eq!(
            documents_panel_payload(Some(&raw), Some(retrieved.as_slice())),
            json!({ "foo": [1, 2] })
        );
    }

    #[test]
    fn payload_synthesizes_documents_object() {
        let retrieved = docs(&[&["doc1"]]);
        assert_eq!(
            documents_panel_payload(None, Some(retrieved.as_slice())),
            json!({ "documents": [["doc1"]] })
        );
        assert_eq!(documents_panel_payload(None, None), json!({ "documents": [] }));
    }

    #[test]
    fn payload_keeps_top_level_array_raw() {
        let raw = json!([["a"], ["b"]]);
        assert_eq!(documents_panel_payload(Some(&raw), None), raw);
    }

    #[test]
    fn gates_are_independent() {
        let none = EvidenceBundle::default();
        assert!(EvidenceGates::from_bundle(&none).is_empty());

        let ids_only = EvidenceBundle {
            reranked_ids: Some(vec![2]),
            ..EvidenceBundle::default()
        };
        assert_eq!(
            EvidenceGates::from_bundle(&ids_only),
            EvidenceGates {
                documents: false,
                ranked_ids: true
            }
        );

        let both = EvidenceBundle {
            retrieved: Some(docs(&[&["x"]])),
            reranked_ids: Some(vec![0]),
            retrieval_raw: None,
        };
        assert_eq!(
            EvidenceGates::from_bundle(&both),
            EvidenceGates {
                documents: true,
                ranked_ids: true
            }
        );
    }

    #[test]
    fn empty_lists_open_no_panels() {
        let bundle = EvidenceBundle {
            retrieved: Some(vec![]),
            reranked_ids: Some(vec![]),
            retrieval_raw: None,
        };
        assert!(evidence_panels(&bundle, true).is_empty());
    }

    #[test]
    fn raw_result_alone_opens_documents_panel() {
        let bundle = EvidenceBundle {
            retrieval_raw: Some(json!({})),
            ..EvidenceBundle::default()
        };
        let panels = evidence_panels(&bundle, true);
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].kind, PanelKind::RetrievedDocuments);
        assert_eq!(panels[0].body, json!({}));
    }

    #[test]
    fn ranked_ids_panel_body_is_index_keyed() {
        let bundle = EvidenceBundle {
            reranked_ids: Some(vec![4, 1, 7]),
            ..EvidenceBundle::default()
        };
        let panels = evidence_panels(&bundle, true);
        assert_eq!(panels.len(), 1);
        assert_eq!(panels[0].kind, PanelKind::RankedIds);
        assert!(panels[0].collapsed);
        assert_eq!(panels[0].body, json!({ "0": 4, "1": 1, "2": 7 }));
    }

    #[test]
    fn disabled_indexing_keeps_raw_arrays() {
        let bundle = EvidenceBundle {
            retrieved: Some(docs(&[&["doc1"]])),
            reranked_ids: Some(vec![0]),
            retrieval_raw: None,
        };
        let panels = evidence_panels(&bundle, false);
        assert_eq!(panels[0].body, json!({ "documents": [["doc1"]] }));
        assert_eq!(panels[1].body, json!([0]));
    }
}
