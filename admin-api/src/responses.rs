use serde::Deserialize;

/// Single-use presigned credentials for one direct binary transfer.
///
/// Short-lived by the storage collaborator's policy; never persisted.
#[derive(Deserialize, PartialEq, Eq, Clone, Debug)]
pub struct UploadSlot {
    /// Where the file's bytes go.
    pub upload_url: String,

    /// What the post record will reference once the transfer succeeds.
    pub public_url: String,
}
