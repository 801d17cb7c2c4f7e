use gloo_storage::{LocalStorage, Storage};
use shared::{ConfigStore, StoreError, WEBHOOK_URL_KEY};

/// Webhook URL kept in `localStorage` as a plain string.
pub struct LocalStorageStore;

fn unavailable(err: impl std::fmt::Debug) -> StoreError {
    StoreError::Unavailable(format!("{:?}", err))
}

impl ConfigStore for LocalStorageStore {
    fn read_raw(&self) -> Result<Option<String>, StoreError> {
        LocalStorage::raw().get_item(WEBHOOK_URL_KEY).map_err(unavailable)
    }

    fn write_raw(&self, url: &str) -> Result<(), StoreError> {
        LocalStorage::raw()
            .set_item(WEBHOOK_URL_KEY, url)
            .map_err(unavailable)?;
        log::info!("Webhook URL saved: {}", url);
        Ok(())
    }

    fn remove_raw(&self) -> Result<(), StoreError> {
        LocalStorage::delete(WEBHOOK_URL_KEY);
        log::info!("Webhook URL removed");
        Ok(())
    }
}
