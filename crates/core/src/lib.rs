pub mod conversation;
pub mod evidence;
pub mod message;
pub mod normalize;
pub mod time_label;
pub mod transcript;

pub use conversation::{render, Alignment, MessageView, RenderOptions, RenderTree};
pub use evidence::{documents_panel_payload, EvidencePanel, PanelKind};
pub use message::{AskResponse, EvidenceBundle, Message, Role};
pub use normalize::{normalize, DisplayValue};
pub use time_label::TimeLabelZone;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
