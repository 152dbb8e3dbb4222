//! # services
//!
//! Application services. Each write follows the same contract: validate the
//! raw payload against the entity schema, and only on success call the
//! repository port. Port failures are classified into [`AppError`].

mod boards;
mod cards;
mod lists;
mod users;

use std::sync::Arc;

use domains::{
    Access, AppError, BoardRepository, CardRepository, ListRepository, StorageError,
    UserRepository,
};
use serde_json::Value;

pub use boards::BoardService;
pub use cards::CardService;
pub use lists::ListService;
pub use users::UserService;

/// All services, wired to one store.
#[derive(Clone)]
pub struct Services {
    pub users: UserService,
    pub boards: BoardService,
    pub lists: ListService,
    pub cards: CardService,
}

impl Services {
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: UserRepository + BoardRepository + ListRepository + CardRepository + 'static,
    {
        Self {
            users: UserService::new(store.clone()),
            boards: BoardService::new(store.clone()),
            lists: ListService::new(store.clone()),
            cards: CardService::new(store.clone(), store),
        }
    }
}

fn read_failure(err: StorageError) -> AppError {
    AppError::from_storage(Access::Read, err)
}

fn write_failure(err: StorageError) -> AppError {
    AppError::from_storage(Access::Write, err)
}

/// Overlay path parameters onto a request body. Path values win over any
/// same-named body field. Non-object bodies are returned untouched so that
/// validation reports them.
fn with_path_fields(payload: &Value, fields: &[(&str, &str)]) -> Value {
    let mut merged = match payload {
        Value::Null => Value::Object(Default::default()),
        other => other.clone(),
    };
    if let Value::Object(map) = &mut merged {
        for (name, raw) in fields {
            map.insert((*name).to_owned(), Value::String((*raw).to_owned()));
        }
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn path_fields_override_body() {
        let merged = with_path_fields(&json!({ "listId": 1, "title": "x" }), &[("listId", "9")]);
        assert_eq!(merged, json!({ "listId": "9", "title": "x" }));
    }

    #[test]
    fn missing_body_becomes_empty_object() {
        let merged = with_path_fields(&Value::Null, &[("cardId", "1"), ("userId", "2")]);
        assert_eq!(merged, json!({ "cardId": "1", "userId": "2" }));
    }

    #[test]
    fn non_object_body_is_left_alone() {
        let merged = with_path_fields(&json!([1, 2]), &[("cardId", "1")]);
        assert_eq!(merged, json!([1, 2]));
    }
}
