use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: i64,
    pub task: String,
    /// Serialized as `0`/`1`, the way the column stores it.
    #[serde(serialize_with = "flag_as_int")]
    pub done: bool,
    pub category_id: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTodo {
    pub task: String,
    pub category_id: i64,
}

fn flag_as_int<S: Serializer>(flag: &bool, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u8(u8::from(*flag))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn todo_serializes_done_as_integer() {
        let todo = Todo {
            id: 2,
            task: "Task 2".to_string(),
            done: true,
            category_id: 2,
        };
        assert_eq!(
            serde_json::to_value(&todo).unwrap(),
            json!({"id": 2, "task": "Task 2", "done": 1, "category_id": 2})
        );
    }
}
