// src/services/course_service.rs
//
// Course write path.
//
// RULES:
// - Every write goes through ONE sequential worker, so writes apply in issue order
// - Callers never wait for a write (except `flush`)
// - Inputs are clamped/normalised here, at the write boundary
// - Each committed write emits exactly one domain event

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::domain::{clamp_rating, normalize_comment, validate_course, Course};
use crate::error::AppResult;
use crate::events::{
    CatalogCleared, CatalogReplaced, CourseFavoriteToggled, CourseReviewSaved, CourseUpserted,
    CoursesImported, EventBus,
};
use crate::repositories::CourseRepository;

#[derive(Debug, Clone)]
enum WriteJob {
    SetFavorite { id: i64, is_favorite: bool },
    SaveReview { id: i64, comment: String, rating: f32 },
    Upsert(Course),
    Import(Vec<Course>),
    Clear,
    Replace(Vec<Course>),
}

impl WriteJob {
    fn describe(&self) -> String {
        match self {
            WriteJob::SetFavorite { id, is_favorite } => {
                format!("favorite={} on course {}", is_favorite, id)
            }
            WriteJob::SaveReview { id, .. } => format!("review on course {}", id),
            WriteJob::Upsert(course) => format!("upsert of course {}", course.id),
            WriteJob::Import(courses) => format!("import of {} courses", courses.len()),
            WriteJob::Clear => "catalog clear".to_string(),
            WriteJob::Replace(courses) => format!("resync of {} courses", courses.len()),
        }
    }
}

enum Command {
    Write(WriteJob),
    Flush(oneshot::Sender<()>),
}

pub struct CourseService {
    queue: mpsc::UnboundedSender<Command>,
    worker: JoinHandle<()>,
}

impl CourseService {
    /// Start the write worker. Must be called from within a tokio runtime.
    pub fn new(course_repo: Arc<dyn CourseRepository>, event_bus: Arc<EventBus>) -> Self {
        let (queue, rx) = mpsc::unbounded_channel();
        let worker = tokio::spawn(run_writer(course_repo, event_bus, rx));
        Self { queue, worker }
    }

    pub fn set_favorite(&self, id: i64, is_favorite: bool) {
        self.enqueue(WriteJob::SetFavorite { id, is_favorite });
    }

    /// Flip the favorite flag of `course` as the caller last saw it
    pub fn toggle_favorite(&self, course: &Course) {
        self.set_favorite(course.id, !course.is_favorite);
    }

    /// Save comment and rating together. Absent comment is stored as empty,
    /// rating is clamped to [0, 5].
    pub fn save_review(&self, id: i64, comment: Option<String>, rating: f32) {
        self.enqueue(WriteJob::SaveReview {
            id,
            comment: normalize_comment(comment),
            rating: clamp_rating(rating),
        });
    }

    pub fn upsert_course(&self, mut course: Course) {
        course.user_rating = clamp_rating(course.user_rating);
        self.enqueue(WriteJob::Upsert(course));
    }

    pub fn import_courses(&self, courses: Vec<Course>) {
        self.enqueue(WriteJob::Import(clamp_all(courses)));
    }

    pub fn clear_catalog(&self) {
        self.enqueue(WriteJob::Clear);
    }

    /// Full resync: replace every row, keeping user fields of surviving ids
    pub fn replace_catalog(&self, courses: Vec<Course>) {
        self.enqueue(WriteJob::Replace(clamp_all(courses)));
    }

    /// Wait until every write issued before this call has been applied
    pub async fn flush(&self) {
        let (done_tx, done_rx) = oneshot::channel();
        if self.queue.send(Command::Flush(done_tx)).is_err() {
            return;
        }
        let _ = done_rx.await;
    }

    pub fn is_running(&self) -> bool {
        !self.worker.is_finished()
    }

    fn enqueue(&self, job: WriteJob) {
        let description = job.describe();
        if self.queue.send(Command::Write(job)).is_err() {
            log::warn!("Write worker stopped, dropping {}", description);
        }
    }
}

fn clamp_all(mut courses: Vec<Course>) -> Vec<Course> {
    for course in &mut courses {
        course.user_rating = clamp_rating(course.user_rating);
    }
    courses
}

async fn run_writer(
    course_repo: Arc<dyn CourseRepository>,
    event_bus: Arc<EventBus>,
    mut rx: mpsc::UnboundedReceiver<Command>,
) {
    while let Some(command) = rx.recv().await {
        let job = match command {
            Command::Write(job) => job,
            Command::Flush(done) => {
                let _ = done.send(());
                continue;
            }
        };

        let description = job.describe();
        let repo = Arc::clone(&course_repo);
        let bus = Arc::clone(&event_bus);

        match tokio::task::spawn_blocking(move || apply(job, repo.as_ref(), &bus)).await {
            Ok(Ok(())) => log::debug!("Applied {}", description),
            Ok(Err(e)) => log::warn!("Failed to apply {}: {}", description, e),
            Err(e) => log::error!("Write task for {} failed: {}", description, e),
        }
    }
}

fn apply(job: WriteJob, repo: &dyn CourseRepository, bus: &EventBus) -> AppResult<()> {
    match job {
        WriteJob::SetFavorite { id, is_favorite } => {
            repo.update_favorite(id, is_favorite)?;
            bus.emit(CourseFavoriteToggled::new(id, is_favorite));
        }
        WriteJob::SaveReview { id, comment, rating } => {
            repo.update_review(id, &comment, rating)?;
            bus.emit(CourseReviewSaved::new(id, rating));
        }
        WriteJob::Upsert(course) => {
            validate_course(&course)?;
            repo.upsert(&course)?;
            bus.emit(CourseUpserted::new(course.id));
        }
        WriteJob::Import(courses) => {
            courses.iter().try_for_each(validate_course)?;
            repo.upsert_many(&courses)?;
            bus.emit(CoursesImported::new(courses.len()));
        }
        WriteJob::Clear => {
            let deleted = repo.delete_all()?;
            bus.emit(CatalogCleared::new(deleted));
        }
        WriteJob::Replace(courses) => {
            courses.iter().try_for_each(validate_course)?;
            repo.replace_all(&courses)?;
            bus.emit(CatalogReplaced::new(courses.len()));
        }
    }
    Ok(())
}
