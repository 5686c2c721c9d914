//! Three-state wrapper published to screens.
//!
//! `Loading` and `Error` may carry stale data from a previous success so a
//! screen can keep showing its list while refreshing or after a failed
//! background refresh.

use serde::{Deserialize, Serialize};

/// Discriminant of a [`ResultState`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Status {
    Loading,
    Success,
    Error,
}

/// What a screen should render right now
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ResultState<T> {
    Loading { data: Option<T> },
    Success { data: T },
    Error { message: String, data: Option<T> },
}

impl<T> ResultState<T> {
    pub fn loading(partial: Option<T>) -> Self {
        ResultState::Loading { data: partial }
    }

    /// An empty collection is a valid success, not an error.
    pub fn success(data: T) -> Self {
        ResultState::Success { data }
    }

    pub fn error(message: impl Into<String>, partial: Option<T>) -> Self {
        ResultState::Error {
            message: message.into(),
            data: partial,
        }
    }

    pub fn status(&self) -> Status {
        match self {
            ResultState::Loading { .. } => Status::Loading,
            ResultState::Success { .. } => Status::Success,
            ResultState::Error { .. } => Status::Error,
        }
    }

    /// Data in any state, including the partial data of Loading and Error
    pub fn data(&self) -> Option<&T> {
        match self {
            ResultState::Loading { data } | ResultState::Error { data, .. } => data.as_ref(),
            ResultState::Success { data } => Some(data),
        }
    }

    pub fn into_data(self) -> Option<T> {
        match self {
            ResultState::Loading { data } | ResultState::Error { data, .. } => data,
            ResultState::Success { data } => Some(data),
        }
    }

    /// Present only in the Error state
    pub fn message(&self) -> Option<&str> {
        match self {
            ResultState::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, ResultState::Loading { .. })
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ResultState::Success { .. })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ResultState::Error { .. })
    }

    pub fn map<U, F>(self, f: F) -> ResultState<U>
    where
        F: FnOnce(T) -> U,
    {
        match self {
            ResultState::Loading { data } => ResultState::Loading { data: data.map(f) },
            ResultState::Success { data } => ResultState::Success { data: f(data) },
            ResultState::Error { message, data } => ResultState::Error {
                message,
                data: data.map(f),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_has_no_message() {
        let state = ResultState::success(vec![1, 2, 3]);
        assert_eq!(state.status(), Status::Success);
        assert!(state.message().is_none());
        assert_eq!(state.data(), Some(&vec![1, 2, 3]));
    }

    #[test]
    fn test_empty_collection_is_success() {
        let state: ResultState<Vec<i32>> = ResultState::success(Vec::new());
        assert_eq!(state.status(), Status::Success);
        assert!(state.message().is_none());
        assert_eq!(state.data(), Some(&Vec::new()));
    }

    #[test]
    fn test_error_keeps_partial_data() {
        let state = ResultState::error("network down", Some(vec!["a", "b"]));
        assert_eq!(state.status(), Status::Error);
        assert_eq!(state.message(), Some("network down"));
        assert_eq!(state.into_data(), Some(vec!["a", "b"]));

        let state: ResultState<Vec<&str>> = ResultState::error("boom", None);
        assert!(state.data().is_none());
    }

    #[test]
    fn test_loading_with_and_without_data() {
        let empty: ResultState<u8> = ResultState::loading(None);
        assert!(empty.is_loading());
        assert!(empty.data().is_none());
        assert!(empty.message().is_none());

        let refreshing = ResultState::loading(Some(4u8));
        assert_eq!(refreshing.data(), Some(&4));
    }

    #[test]
    fn test_map_preserves_variant() {
        let state = ResultState::error("x", Some(2)).map(|n| n * 10);
        assert_eq!(state, ResultState::error("x", Some(20)));

        let state = ResultState::success("abc").map(str::len);
        assert_eq!(state, ResultState::success(3));
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ResultState::error("oops", Some(1))).unwrap();
        assert_eq!(json["status"], "error");
        assert_eq!(json["message"], "oops");
        assert_eq!(json["data"], 1);
    }
}
