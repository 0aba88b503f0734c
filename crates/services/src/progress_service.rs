use std::sync::Arc;

use storage::repository::KeyValueStore;
use tokio::sync::Mutex;
use tutor_core::model::{Level, Pathway};
use tutor_core::progress::{Completion, PathwayProgress, QuizStatus, Restored, storage_keys};

use crate::error::ProgressServiceError;

/// Persists pathway progress in the key/value store, one pair of keys per scope.
///
/// Mutations are serialized and start from the stored state, not from the
/// caller's copy. The caller's state is replaced with the committed progress
/// only once both keys were written, so a failed write leaves it intact.
#[derive(Clone)]
pub struct ProgressService {
    kv: Arc<dyn KeyValueStore>,
    writes: Arc<Mutex<()>>,
}

impl ProgressService {
    #[must_use]
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self {
            kv,
            writes: Arc::new(Mutex::new(())),
        }
    }

    /// Load the stored progress for `scope`.
    ///
    /// Unreadable data is removed from storage and fresh progress is returned
    /// with `Restored::Corrupted`.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the store cannot be read.
    pub async fn load(
        &self,
        scope: &str,
    ) -> Result<(PathwayProgress, Restored), ProgressServiceError> {
        let (completed_key, answers_key) = storage_keys(scope);
        let completed = self.kv.get(&completed_key).await?;
        let answers = self.kv.get(&answers_key).await?;

        let (progress, restored) =
            PathwayProgress::restore(completed.as_deref(), answers.as_deref());
        if restored == Restored::Corrupted {
            tracing::warn!(scope, "stored pathway progress is unreadable; clearing it");
            self.kv.remove_many(&[completed_key, answers_key]).await?;
        }
        Ok((progress, restored))
    }

    /// Mark a step complete and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if the step does not exist or the write fails.
    pub async fn mark_completed(
        &self,
        scope: &str,
        progress: &mut PathwayProgress,
        pathway: &Pathway,
        level: Level,
        index: usize,
    ) -> Result<Completion, ProgressServiceError> {
        let _guard = self.writes.lock().await;
        let mut next = self.committed(scope).await?;
        let completion = next.mark_step_completed(pathway, level, index)?;
        if completion == Completion::Newly {
            self.save(scope, &next).await?;
        }
        *progress = next;
        Ok(completion)
    }

    /// Record a quiz choice and persist.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError` if the quiz or option does not exist or
    /// the write fails.
    #[allow(clippy::too_many_arguments)]
    pub async fn answer_quiz(
        &self,
        scope: &str,
        progress: &mut PathwayProgress,
        pathway: &Pathway,
        level: Level,
        step: usize,
        quiz: usize,
        option: &str,
    ) -> Result<QuizStatus, ProgressServiceError> {
        let _guard = self.writes.lock().await;
        let mut next = self.committed(scope).await?;
        let status = next.select_quiz_answer(pathway, level, step, quiz, option)?;
        self.save(scope, &next).await?;
        *progress = next;
        Ok(status)
    }

    /// Clear progress in memory and in storage.
    ///
    /// # Errors
    ///
    /// Returns `ProgressServiceError::Storage` if the keys cannot be removed.
    pub async fn reset(
        &self,
        scope: &str,
        progress: &mut PathwayProgress,
    ) -> Result<(), ProgressServiceError> {
        let _guard = self.writes.lock().await;
        let (completed_key, answers_key) = storage_keys(scope);
        self.kv.remove_many(&[completed_key, answers_key]).await?;
        progress.reset();
        tracing::info!(scope, "pathway progress reset");
        Ok(())
    }

    // Unreadable stored data counts as empty; the next write replaces it.
    async fn committed(&self, scope: &str) -> Result<PathwayProgress, ProgressServiceError> {
        let (completed_key, answers_key) = storage_keys(scope);
        let completed = self.kv.get(&completed_key).await?;
        let answers = self.kv.get(&answers_key).await?;
        let (progress, _) = PathwayProgress::restore(completed.as_deref(), answers.as_deref());
        Ok(progress)
    }

    async fn save(&self, scope: &str, progress: &PathwayProgress) -> Result<(), ProgressServiceError> {
        let stored = progress.to_stored()?;
        let (completed_key, answers_key) = storage_keys(scope);
        self.kv
            .set_many(&[(completed_key, stored.completed), (answers_key, stored.answers)])
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::{InMemoryRepository, StorageError};
    use tutor_core::payload::classify_reply;

    const PATHWAY: &str = r#"{"learningPathway": {
        "title": "Web",
        "levels": {
            "Beginner": [
                {"title": "HTML", "quizzes": [{"question": "Tag?", "options": ["<p>", "<q>"], "answer": "<p>"}]},
                {"title": "CSS"}
            ]
        }
    }}"#;

    fn pathway() -> Pathway {
        classify_reply(PATHWAY).as_pathway().cloned().unwrap()
    }

    struct BrokenStore;

    #[async_trait]
    impl KeyValueStore for BrokenStore {
        async fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        async fn set_many(&self, _entries: &[(String, String)]) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }

        async fn remove_many(&self, _keys: &[String]) -> Result<(), StorageError> {
            Err(StorageError::Connection("disk full".into()))
        }
    }

    #[tokio::test]
    async fn progress_survives_a_reload() {
        let kv = Arc::new(InMemoryRepository::new());
        let service = ProgressService::new(kv.clone());
        let pathway = pathway();

        let (mut progress, restored) = service.load("msg-1").await.unwrap();
        assert_eq!(restored, Restored::Fresh);
        let completion = service
            .mark_completed("msg-1", &mut progress, &pathway, Level::Beginner, 1)
            .await
            .unwrap();
        assert_eq!(completion, Completion::Newly);
        let status = service
            .answer_quiz("msg-1", &mut progress, &pathway, Level::Beginner, 0, 0, "<q>")
            .await
            .unwrap();
        assert!(matches!(status, QuizStatus::Incorrect { .. }));

        let (reloaded, restored) = service.load("msg-1").await.unwrap();
        assert_eq!(restored, Restored::Loaded);
        assert_eq!(reloaded, progress);

        let (other, restored) = service.load("msg-2").await.unwrap();
        assert_eq!(restored, Restored::Fresh);
        assert!(other.is_empty());
    }

    #[tokio::test]
    async fn corrupted_progress_is_cleared() {
        let kv = Arc::new(InMemoryRepository::new());
        kv.set_many(&[("learningPathwayProgress:m".into(), "{oops".into())])
            .await
            .unwrap();
        let service = ProgressService::new(kv.clone());

        let (progress, restored) = service.load("m").await.unwrap();
        assert_eq!(restored, Restored::Corrupted);
        assert!(progress.is_empty());
        assert!(kv.get("learningPathwayProgress:m").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_write_leaves_state_untouched() {
        let service = ProgressService::new(Arc::new(BrokenStore));
        let pathway = pathway();
        let mut progress = PathwayProgress::new();

        let err = service
            .mark_completed("m", &mut progress, &pathway, Level::Beginner, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::Storage(_)));
        assert!(progress.is_empty());
    }

    #[tokio::test]
    async fn invalid_step_is_rejected_before_writing() {
        let service = ProgressService::new(Arc::new(BrokenStore));
        let mut progress = PathwayProgress::new();
        let err = service
            .mark_completed("m", &mut progress, &pathway(), Level::Advanced, 0)
            .await
            .unwrap_err();
        assert!(matches!(err, ProgressServiceError::Progress(_)));
    }

    #[tokio::test]
    async fn overlapping_mutations_keep_each_other() {
        let kv = Arc::new(InMemoryRepository::new());
        let service = ProgressService::new(kv.clone());
        let pathway = pathway();
        let (loaded, _) = service.load("m").await.unwrap();

        let mut first = loaded.clone();
        let mut second = loaded.clone();
        let mut third = loaded;
        let (a, b, c) = tokio::join!(
            service.mark_completed("m", &mut first, &pathway, Level::Beginner, 0),
            service.mark_completed("m", &mut second, &pathway, Level::Beginner, 1),
            service.answer_quiz("m", &mut third, &pathway, Level::Beginner, 0, 0, "<p>"),
        );
        assert_eq!(a.unwrap(), Completion::Newly);
        assert_eq!(b.unwrap(), Completion::Newly);
        assert_eq!(c.unwrap(), QuizStatus::Correct);

        let (reloaded, _) = service.load("m").await.unwrap();
        assert!(reloaded.is_step_completed(Level::Beginner, 0));
        assert!(reloaded.is_step_completed(Level::Beginner, 1));
        let quiz = &pathway.step(Level::Beginner, 0).unwrap().quizzes[0];
        assert_eq!(
            reloaded.quiz_status(Level::Beginner, 0, 0, quiz),
            QuizStatus::Correct
        );
    }

    #[tokio::test]
    async fn stale_caller_state_does_not_overwrite_storage() {
        let kv = Arc::new(InMemoryRepository::new());
        let service = ProgressService::new(kv.clone());
        let pathway = pathway();
        let mut saved = PathwayProgress::new();
        service
            .mark_completed("m", &mut saved, &pathway, Level::Beginner, 0)
            .await
            .unwrap();

        // A view that has not finished loading still holds empty progress.
        let mut unloaded = PathwayProgress::new();
        service
            .mark_completed("m", &mut unloaded, &pathway, Level::Beginner, 1)
            .await
            .unwrap();
        assert!(unloaded.is_step_completed(Level::Beginner, 0));

        let (reloaded, _) = service.load("m").await.unwrap();
        assert_eq!(reloaded, unloaded);
    }

    #[tokio::test]
    async fn reset_removes_both_keys() {
        let kv = Arc::new(InMemoryRepository::new());
        let service = ProgressService::new(kv.clone());
        let pathway = pathway();
        let mut progress = PathwayProgress::new();
        service
            .mark_completed("m", &mut progress, &pathway, Level::Beginner, 0)
            .await
            .unwrap();

        service.reset("m", &mut progress).await.unwrap();
        assert!(progress.is_empty());
        assert!(kv.get("learningPathwayProgress:m").await.unwrap().is_none());
        assert!(kv.get("learningPathwayQuizAnswers:m").await.unwrap().is_none());
    }
}
