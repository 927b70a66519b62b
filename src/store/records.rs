use crate::errors::AppResult;
use crate::models::event::AttendanceEvent;
use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Username → chronological-by-insertion list of clock events.
pub type RecordMap = BTreeMap<String, Vec<AttendanceEvent>>;

/// Access to the attendance document. Event positions within a user's list
/// are the indices the admin endpoints address, so removals shift all later
/// events down by one.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(super::RECORDS_FILE),
        }
    }

    /// Read the whole attendance document, creating an empty one on first
    /// access.
    pub async fn load(&self) -> AppResult<RecordMap> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                if let Some(parent) = self.path.parent() {
                    tokio::fs::create_dir_all(parent).await?;
                }
                tokio::fs::write(&self.path, "{}").await?;
                Ok(RecordMap::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, records: &RecordMap) -> AppResult<()> {
        let raw = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&self.path, raw).await?;
        Ok(())
    }

    /// One user's event list, empty when the user has none yet.
    pub async fn user_events(&self, username: &str) -> AppResult<Vec<AttendanceEvent>> {
        Ok(self
            .load()
            .await?
            .get(username)
            .cloned()
            .unwrap_or_default())
    }

    /// Append an event to a user's list, creating the list if needed.
    pub async fn add(&self, username: &str, event: AttendanceEvent) -> AppResult<AttendanceEvent> {
        let mut records = self.load().await?;
        records
            .entry(username.to_string())
            .or_default()
            .push(event.clone());
        self.save(&records).await?;
        Ok(event)
    }

    /// Replace the event at `index` in a user's list. Returns `None` when
    /// the user or the index does not exist.
    pub async fn update(
        &self,
        username: &str,
        index: usize,
        event: AttendanceEvent,
    ) -> AppResult<Option<AttendanceEvent>> {
        let mut records = self.load().await?;
        let replaced = match records.get_mut(username) {
            Some(events) if index < events.len() => {
                events[index] = event.clone();
                true
            }
            _ => false,
        };

        if !replaced {
            return Ok(None);
        }
        self.save(&records).await?;
        Ok(Some(event))
    }

    /// Remove the event at `index` from a user's list. Returns `false` when
    /// the user or the index does not exist.
    pub async fn delete(&self, username: &str, index: usize) -> AppResult<bool> {
        let mut records = self.load().await?;
        let removed = match records.get_mut(username) {
            Some(events) if index < events.len() => {
                events.remove(index);
                true
            }
            _ => false,
        };

        if removed {
            self.save(&records).await?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event_type::EventType;

    fn event(kind: EventType, ts: &str) -> AttendanceEvent {
        AttendanceEvent::new(kind, ts.to_string())
    }

    #[tokio::test]
    async fn first_load_creates_an_empty_document() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(&tmp.path().join("data"));

        let records = store.load().await.unwrap();
        assert!(records.is_empty());

        let raw = tokio::fs::read_to_string(tmp.path().join("data").join(super::super::RECORDS_FILE))
            .await
            .unwrap();
        assert_eq!(raw, "{}");
    }

    #[tokio::test]
    async fn add_appends_in_insertion_order() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());

        store
            .add("anna", event(EventType::Entry, "2024-05-04T08:00:00Z"))
            .await
            .unwrap();
        store
            .add("anna", event(EventType::Exit, "2024-05-04T16:00:00Z"))
            .await
            .unwrap();

        let records = store.load().await.unwrap();
        let events = &records["anna"];
        assert_eq!(events.len(), 2);
        assert_eq!(events[0].kind, EventType::Entry);
        assert_eq!(events[1].kind, EventType::Exit);
    }

    #[tokio::test]
    async fn user_events_is_empty_for_unknown_users() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());

        assert!(store.user_events("anna").await.unwrap().is_empty());

        store
            .add("anna", event(EventType::Entry, "2024-05-04T08:00:00Z"))
            .await
            .unwrap();
        assert_eq!(store.user_events("anna").await.unwrap().len(), 1);
        assert!(store.user_events("bert").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_replaces_only_the_addressed_event() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());

        store
            .add("anna", event(EventType::Entry, "2024-05-04T08:00:00Z"))
            .await
            .unwrap();
        store
            .add("anna", event(EventType::Exit, "2024-05-04T16:00:00Z"))
            .await
            .unwrap();

        let updated = store
            .update("anna", 0, event(EventType::Entry, "2024-05-04T07:30:00Z"))
            .await
            .unwrap();
        assert!(updated.is_some());

        let records = store.load().await.unwrap();
        assert_eq!(records["anna"][0].timestamp, "2024-05-04T07:30:00Z");
        assert_eq!(records["anna"][1].timestamp, "2024-05-04T16:00:00Z");
    }

    #[tokio::test]
    async fn update_out_of_range_returns_none() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());

        store
            .add("anna", event(EventType::Entry, "2024-05-04T08:00:00Z"))
            .await
            .unwrap();

        let updated = store
            .update("anna", 5, event(EventType::Exit, "2024-05-04T16:00:00Z"))
            .await
            .unwrap();
        assert!(updated.is_none());

        let missing = store
            .update("nobody", 0, event(EventType::Exit, "2024-05-04T16:00:00Z"))
            .await
            .unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn delete_shifts_later_events_down() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());

        store
            .add("anna", event(EventType::Entry, "2024-05-04T08:00:00Z"))
            .await
            .unwrap();
        store
            .add("anna", event(EventType::Exit, "2024-05-04T16:00:00Z"))
            .await
            .unwrap();

        assert!(store.delete("anna", 0).await.unwrap());

        let records = store.load().await.unwrap();
        assert_eq!(records["anna"].len(), 1);
        assert_eq!(records["anna"][0].timestamp, "2024-05-04T16:00:00Z");
    }

    #[tokio::test]
    async fn delete_out_of_range_returns_false() {
        let tmp = tempfile::tempdir().unwrap();
        let store = RecordStore::new(tmp.path());

        assert!(!store.delete("anna", 0).await.unwrap());
    }

    #[tokio::test]
    async fn a_corrupt_document_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        tokio::fs::write(tmp.path().join(super::super::RECORDS_FILE), "not json")
            .await
            .unwrap();

        let store = RecordStore::new(tmp.path());
        assert!(store.load().await.is_err());
    }
}
