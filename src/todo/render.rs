//! List page rendering.

use std::fmt::Write;

use crate::store::Task;

const PAGE_HEAD: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <title>Manual To-Do List</title>
  <style>
    body { font-family: Arial, sans-serif; background-color: #f4f4f9; margin: 40px auto; padding: 20px; max-width: 600px; box-shadow: 0 0 10px rgba(0,0,0,0.1); }
    h1 { color: #333; }
    form { margin-bottom: 20px; }
    input[type="text"] { padding: 10px; width: calc(100% - 22px); margin-bottom: 10px; }
    input[type="submit"] { background-color: #5cb85c; border: none; color: white; padding: 10px 20px; text-transform: uppercase; letter-spacing: 0.05em; cursor: pointer; }
    ul { list-style-type: none; padding: 0; }
    li { position: relative; padding: 8px; background-color: #fff; border-bottom: 1px solid #ddd; }
    .delete-button { position: absolute; right: 10px; top: 10px; background-color: #ff6347; color: white; border: none; padding: 5px 10px; border-radius: 5px; cursor: pointer; }
  </style>
</head>
<body>
  <h1>Manual To-Do List</h1>
  <form action="/add" method="post">
    <input type="text" name="task" placeholder="Add new task">
    <input type="submit" value="Add Task">
  </form>
  <ul>
"#;

const PAGE_TAIL: &str = "  </ul>\n</body>\n</html>\n";

/// Render the home page listing `tasks`.
pub fn render_home(tasks: &[Task]) -> String {
    let mut page = String::with_capacity(PAGE_HEAD.len() + PAGE_TAIL.len() + tasks.len() * 128);
    page.push_str(PAGE_HEAD);
    for task in tasks {
        // Writing to a String cannot fail.
        let _ = writeln!(
            page,
            r#"    <li>{} <button class="delete-button" onclick="location.href='/delete/{}'">Delete</button></li>"#,
            escape_html(&task.description),
            task.id
        );
    }
    page.push_str(PAGE_TAIL);
    page
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_lists_tasks() {
        let tasks = vec![
            Task { id: 1, description: "buy milk".into() },
            Task { id: 7, description: "walk dog".into() },
        ];
        let page = render_home(&tasks);

        assert!(page.contains("<li>buy milk "));
        assert!(page.contains("location.href='/delete/7'"));
        assert!(page.find("buy milk") < page.find("walk dog"));
        assert!(page.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_render_escapes_descriptions() {
        let tasks = vec![Task { id: 1, description: "<script>alert('x')</script>".into() }];
        let page = render_home(&tasks);

        assert!(!page.contains("<script>"));
        assert!(page.contains("&lt;script&gt;alert(&#x27;x&#x27;)&lt;/script&gt;"));
    }
}
