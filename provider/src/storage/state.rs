//! Resource state file

use crate::errors::ProviderError;
use crate::filesys::file::File;
use crate::models::resource::ResourceState;

/// Load resource state
pub async fn load_state(state_file: &File) -> Result<ResourceState, ProviderError> {
    if !state_file.exists().await {
        return Err(ProviderError::NotFound(format!(
            "no resource state at {}",
            state_file.path().display()
        )));
    }
    state_file.read_json().await
}

/// Save resource state
pub async fn save_state(state_file: &File, state: &ResourceState) -> Result<(), ProviderError> {
    state_file.write_json(state).await
}

/// Forget resource state
pub async fn remove_state(state_file: &File) -> Result<(), ProviderError> {
    state_file.delete().await
}
