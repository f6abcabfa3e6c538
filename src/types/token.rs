use serde::{Deserialize, Serialize};

/// Form accepted by `POST /add_token`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AddTokenForm {
    pub topic: Option<String>,
    pub token: Option<String>,
}

/// Form accepted by `POST /remove_token`. Without `token` every token of the
/// topic is removed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RemoveTokenForm {
    pub topic: Option<String>,
    pub token: Option<String>,
}
