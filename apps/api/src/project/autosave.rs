//! Debounced autosave.
//!
//! Classic trailing-edge debounce: every edit restarts a fixed window and
//! only the newest working copy is written when the window closes. A save
//! is skipped while the working copy deep-equals the last-saved snapshot.
//! There is no cancellation path except teardown — dropping every handle
//! closes the channel and the actor exits, abandoning any pending window.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, error};
use uuid::Uuid;

use crate::models::project::ResumeProject;
use crate::store::ProjectStore;

/// Debounce window between the last edit and the save it triggers.
pub const AUTOSAVE_DEBOUNCE: Duration = Duration::from_millis(2_000);

/// Feeds edits into the autosave actor. Cheap to clone; held in `AppState`.
#[derive(Clone)]
pub struct AutosaveHandle {
    tx: mpsc::UnboundedSender<ResumeProject>,
}

impl AutosaveHandle {
    /// Marks the project dirty with its latest working copy. The pending
    /// window (if any) restarts. Edits sent after teardown are dropped.
    pub fn notify_edit(&self, project: ResumeProject) {
        let _ = self.tx.send(project);
    }
}

/// Spawns the autosave actor. One actor serves every project; windows are
/// tracked per project id.
pub fn spawn_autosaver(
    store: Arc<dyn ProjectStore>,
    delay: Duration,
) -> (AutosaveHandle, JoinHandle<()>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let task = tokio::spawn(run(store, delay, rx));
    (AutosaveHandle { tx }, task)
}

async fn run(
    store: Arc<dyn ProjectStore>,
    delay: Duration,
    mut rx: mpsc::UnboundedReceiver<ResumeProject>,
) {
    // Pending working copies with their window deadlines, and the snapshot
    // each project last saved (for the skip-if-unchanged check).
    let mut pending: HashMap<Uuid, (ResumeProject, Instant)> = HashMap::new();
    let mut last_saved: HashMap<Uuid, ResumeProject> = HashMap::new();

    loop {
        let next_deadline = pending.values().map(|(_, deadline)| *deadline).min();
        // Placeholder instant keeps the disabled branch constructible.
        let park_until = next_deadline.unwrap_or_else(|| Instant::now() + Duration::from_secs(60));

        tokio::select! {
            edit = rx.recv() => {
                match edit {
                    Some(project) => {
                        pending.insert(project.id, (project, Instant::now() + delay));
                    }
                    // All handles dropped: teardown.
                    None => break,
                }
            }
            _ = sleep_until(park_until), if next_deadline.is_some() => {
                flush_due(store.as_ref(), &mut pending, &mut last_saved).await;
            }
        }
    }
}

async fn flush_due(
    store: &dyn ProjectStore,
    pending: &mut HashMap<Uuid, (ResumeProject, Instant)>,
    last_saved: &mut HashMap<Uuid, ResumeProject>,
) {
    let now = Instant::now();
    let due: Vec<Uuid> = pending
        .iter()
        .filter(|(_, (_, deadline))| *deadline <= now)
        .map(|(id, _)| *id)
        .collect();

    for id in due {
        let Some((project, _)) = pending.remove(&id) else {
            continue;
        };

        if last_saved.get(&id).is_some_and(|saved| unchanged(saved, &project)) {
            debug!("autosave skipped for project {id}: no changes since last save");
            continue;
        }

        match store.upsert_project(&project).await {
            Ok(()) => {
                debug!("autosaved project {id}");
                last_saved.insert(id, project);
            }
            // In-memory state is untouched on failure; the next edit gets
            // another chance.
            Err(e) => error!("autosave failed for project {id}: {e}"),
        }
    }
}

/// Deep-equality on user-visible content. Bookkeeping stamps (revision,
/// last_modified) advance on every edit and must not defeat the skip.
fn unchanged(saved: &ResumeProject, current: &ResumeProject) -> bool {
    saved.data == current.data
        && saved.title == current.title
        && saved.template == current.template
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::project::ResumeProject;
    use crate::models::resume::ResumeData;
    use crate::store::StoreError;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tokio::time::sleep;

    /// Store double that records every upsert.
    #[derive(Default)]
    struct RecordingStore {
        saves: Mutex<Vec<ResumeProject>>,
    }

    impl RecordingStore {
        fn save_count(&self) -> usize {
            self.saves.lock().unwrap().len()
        }

        fn last_saved_summary(&self) -> String {
            self.saves
                .lock()
                .unwrap()
                .last()
                .map(|p| p.data.personal_info.summary.clone())
                .unwrap_or_default()
        }
    }

    #[async_trait]
    impl ProjectStore for RecordingStore {
        async fn list_projects(&self, _user_id: &str) -> Result<Vec<ResumeProject>, StoreError> {
            Ok(vec![])
        }

        async fn get_project(&self, _id: Uuid) -> Result<Option<ResumeProject>, StoreError> {
            Ok(None)
        }

        async fn upsert_project(&self, project: &ResumeProject) -> Result<(), StoreError> {
            self.saves.lock().unwrap().push(project.clone());
            Ok(())
        }

        async fn delete_project(&self, _id: Uuid) -> Result<(), StoreError> {
            Ok(())
        }

        async fn load_master_profile(
            &self,
            _user_id: &str,
        ) -> Result<Option<ResumeData>, StoreError> {
            Ok(None)
        }

        async fn save_master_profile(
            &self,
            _user_id: &str,
            _data: &ResumeData,
        ) -> Result<(), StoreError> {
            Ok(())
        }
    }

    fn edited(project: &ResumeProject, summary: &str) -> ResumeProject {
        let mut copy = project.clone();
        copy.data.personal_info.summary = summary.to_string();
        copy
    }

    #[tokio::test(start_paused = true)]
    async fn test_two_edits_inside_the_window_save_once_at_trailing_edge() {
        let store = Arc::new(RecordingStore::default());
        let (handle, _task) = spawn_autosaver(store.clone(), Duration::from_millis(2_000));
        let project = ResumeProject::new("user-1", "Test", ResumeData::default());

        // Edit at t=0, second edit at t=1000 restarts the window.
        handle.notify_edit(edited(&project, "state at t=0"));
        sleep(Duration::from_millis(1_000)).await;
        handle.notify_edit(edited(&project, "state at t=1000"));

        // t=2900: window (restarted at t=1000) has not closed yet.
        sleep(Duration::from_millis(1_900)).await;
        assert_eq!(store.save_count(), 0);

        // t=3100: exactly one save, reflecting the t=1000 state.
        sleep(Duration::from_millis(200)).await;
        assert_eq!(store.save_count(), 1);
        assert_eq!(store.last_saved_summary(), "state at t=1000");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_working_copy_skips_the_save() {
        let store = Arc::new(RecordingStore::default());
        let (handle, _task) = spawn_autosaver(store.clone(), Duration::from_millis(2_000));
        let project = ResumeProject::new("user-1", "Test", ResumeData::default());

        handle.notify_edit(edited(&project, "same"));
        sleep(Duration::from_millis(2_100)).await;
        assert_eq!(store.save_count(), 1);

        // Same content again (an edit that was immediately reverted).
        handle.notify_edit(edited(&project, "same"));
        sleep(Duration::from_millis(2_100)).await;
        assert_eq!(store.save_count(), 1);

        // Real change saves again.
        handle.notify_edit(edited(&project, "different"));
        sleep(Duration::from_millis(2_100)).await;
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_projects_debounce_independently() {
        let store = Arc::new(RecordingStore::default());
        let (handle, _task) = spawn_autosaver(store.clone(), Duration::from_millis(2_000));
        let a = ResumeProject::new("user-1", "A", ResumeData::default());
        let b = ResumeProject::new("user-1", "B", ResumeData::default());

        handle.notify_edit(edited(&a, "a1"));
        sleep(Duration::from_millis(1_500)).await;
        // Editing B must not restart A's window.
        handle.notify_edit(edited(&b, "b1"));

        sleep(Duration::from_millis(600)).await; // t=2100: A due
        assert_eq!(store.save_count(), 1);
        sleep(Duration::from_millis(1_500)).await; // t=3600: B due at 3500
        assert_eq!(store.save_count(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_teardown_abandons_pending_window() {
        let store = Arc::new(RecordingStore::default());
        let (handle, task) = spawn_autosaver(store.clone(), Duration::from_millis(2_000));
        let project = ResumeProject::new("user-1", "Test", ResumeData::default());

        handle.notify_edit(edited(&project, "never saved"));
        drop(handle);

        // Actor exits without flushing the pending edit.
        task.await.unwrap();
        assert_eq!(store.save_count(), 0);
    }
}
