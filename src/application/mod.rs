// src/application/mod.rs
//
// Application Layer
//
// ARCHITECTURE:
// - Screen models sit ABOVE services and live queries
// - Each model owns one published ResultState stream
// - Error mapping for screen messages lives here

pub mod course_detail;
pub mod course_list;
pub mod error_handling;
pub mod favorites;
pub mod state;
pub mod state_stream;

pub use course_detail::CourseDetailModel;
pub use course_list::CourseListModel;
pub use error_handling::{ErrorResponse, ErrorType};
pub use favorites::FavoritesModel;
pub use state::AppState;
pub use state_stream::{StatePublisher, StateStream};
