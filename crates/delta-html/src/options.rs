use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Knobs for the built-in formats.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderOptions {
    /// Prepended to every class the built-in formats emit, e.g. `"ql-"`.
    pub class_prefix: SmolStr,
    /// `target` attribute for links. `None` leaves it off.
    pub link_target: Option<SmolStr>,
    /// Written into a block that would otherwise be empty.
    pub empty_block: SmolStr,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            class_prefix: SmolStr::default(),
            link_target: Some(SmolStr::new_static("_blank")),
            empty_block: SmolStr::new_static("<br>"),
        }
    }
}

impl RenderOptions {
    pub(crate) fn class(&self, name: &str, value: &str) -> SmolStr {
        smol_str::format_smolstr!("{}{}-{}", self.class_prefix, name, value)
    }
}
