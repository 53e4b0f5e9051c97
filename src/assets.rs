/// File name looked up in the configured template folder.
pub const INDEX_TEMPLATE: &str = "todos.html";

pub const INDEX_HTML: &str = include_str!("../templates/todos.html");
