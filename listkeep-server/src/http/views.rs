//! HTML pages and Turbo Stream fragments for the list resource
//!
//! Every piece of user text goes through [`escape`].

use std::fmt::Write as _;

use crate::models::{List, ListParams, ValidationError};

/// DOM id of the `<ul>` holding list rows
pub const LISTS_DOM_ID: &str = "lists";
/// DOM id of the notice container
pub const FLASH_DOM_ID: &str = "flash";
/// DOM id of the inline creation form
pub const NEW_LIST_DOM_ID: &str = "new_list";

const TURBO_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/@hotwired/turbo@8/dist/turbo.es2017-esm.js";

/// Field values and errors backing a create or edit form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListForm {
    /// `None` for a list that has not been saved
    pub id: Option<i64>,
    pub name: String,
    pub errors: Vec<String>,
}

impl ListForm {
    /// Empty template for a new list
    pub fn blank() -> Self {
        Self::default()
    }

    pub fn for_list(list: &List) -> Self {
        Self {
            id: Some(list.id),
            name: list.name.clone(),
            errors: Vec::new(),
        }
    }

    /// Form holding the values that failed to save
    pub fn rejected(id: Option<i64>, fallback_name: &str, params: &ListParams, err: &ValidationError) -> Self {
        Self {
            id,
            name: params.name.clone().unwrap_or_else(|| fallback_name.to_owned()),
            errors: vec![capitalize(&err.to_string())],
        }
    }

    fn dom_id(&self) -> String {
        match self.id {
            Some(id) => format!("edit_list_{}", id),
            None => NEW_LIST_DOM_ID.to_owned(),
        }
    }

    fn action(&self) -> String {
        match self.id {
            Some(id) => format!("{}?_method=patch", list_path(id)),
            None => LISTS_PATH.to_owned(),
        }
    }
}

/// Collection path
pub const LISTS_PATH: &str = "/lists";

pub fn list_path(id: i64) -> String {
    format!("{}/{}", LISTS_PATH, id)
}

pub fn list_dom_id(id: i64) -> String {
    format!("list_{}", id)
}

/// Escape text for HTML element content and double-quoted attributes.
pub fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn layout(title: &str, notice: Option<&str>, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<title>{title}</title>
<script type="module" src="{TURBO_SCRIPT}"></script>
</head>
<body>
{flash}
<main>
{body}
</main>
</body>
</html>
"#,
        title = escape(title),
        flash = flash(notice),
    )
}

fn flash(notice: Option<&str>) -> String {
    match notice {
        Some(notice) => format!(
            r#"<div id="{FLASH_DOM_ID}"><p class="notice">{}</p></div>"#,
            escape(notice)
        ),
        None => format!(r#"<div id="{FLASH_DOM_ID}"></div>"#),
    }
}

/// One row of the index
pub fn list_row(list: &List) -> String {
    let path = list_path(list.id);
    format!(
        r#"<li id="{dom_id}"><a href="{path}">{name}</a> <a href="{path}/edit">Edit</a> <form method="post" action="{path}?_method=delete" style="display:inline"><button type="submit">Delete</button></form></li>"#,
        dom_id = list_dom_id(list.id),
        name = escape(&list.name),
    )
}

/// Create or edit form partial
pub fn form(form: &ListForm) -> String {
    let mut html = String::new();
    let _ = write!(
        html,
        r#"<form id="{}" method="post" action="{}">"#,
        form.dom_id(),
        form.action()
    );
    if !form.errors.is_empty() {
        html.push_str(r#"<div class="errors"><ul>"#);
        for error in &form.errors {
            let _ = write!(html, "<li>{}</li>", escape(error));
        }
        html.push_str("</ul></div>");
    }
    let _ = write!(
        html,
        r#"<label for="list_name">Name</label> <input type="text" id="list_name" name="list[name]" value="{}"> <button type="submit">{}</button></form>"#,
        escape(&form.name),
        if form.id.is_some() { "Update List" } else { "Create List" }
    );
    html
}

pub fn index_page(lists: &[List], notice: Option<&str>) -> String {
    let mut body = String::from("<h1>Lists</h1>\n");
    body.push_str(&form(&ListForm::blank()));
    let _ = write!(body, "\n<ul id=\"{}\">\n", LISTS_DOM_ID);
    for list in lists {
        body.push_str(&list_row(list));
        body.push('\n');
    }
    body.push_str("</ul>\n");
    let _ = write!(body, r#"<p><a href="{}/new">New List</a></p>"#, LISTS_PATH);
    layout("Lists", notice, &body)
}

pub fn show_page(list: &List, notice: Option<&str>) -> String {
    let path = list_path(list.id);
    let body = format!(
        r#"<h1>{name}</h1>
<p>Created {created}</p>
<p><a href="{path}/edit">Edit</a> | <a href="{LISTS_PATH}">Back to lists</a></p>
<form method="post" action="{path}?_method=delete"><button type="submit">Delete</button></form>"#,
        name = escape(&list.name),
        created = list.created_at.format("%Y-%m-%d %H:%M UTC"),
    );
    layout(&list.name, notice, &body)
}

pub fn new_page(list_form: &ListForm, notice: Option<&str>) -> String {
    let body = format!(
        r#"<h1>New List</h1>
{}
<p><a href="{LISTS_PATH}">Back to lists</a></p>"#,
        form(list_form)
    );
    layout("New List", notice, &body)
}

pub fn edit_page(list_form: &ListForm, notice: Option<&str>) -> String {
    let back = list_form.id.map(list_path).unwrap_or_else(|| LISTS_PATH.to_owned());
    let body = format!(
        r#"<h1>Editing List</h1>
{}
<p><a href="{back}">Show</a> | <a href="{LISTS_PATH}">Back to lists</a></p>"#,
        form(list_form)
    );
    layout("Editing List", notice, &body)
}

/// A single `<turbo-stream>` element; `remove` carries no template.
pub fn stream(action: &str, target: &str, content: Option<&str>) -> String {
    match content {
        Some(content) => format!(
            r#"<turbo-stream action="{action}" target="{target}"><template>{content}</template></turbo-stream>"#
        ),
        None => format!(r#"<turbo-stream action="{action}" target="{target}"></turbo-stream>"#),
    }
}

fn notice_stream(notice: &str) -> String {
    stream(
        "update",
        FLASH_DOM_ID,
        Some(&format!(r#"<p class="notice">{}</p>"#, escape(notice))),
    )
}

/// New row on top, fresh form, notice
pub fn created_stream(list: &List, notice: &str) -> String {
    [
        stream("prepend", LISTS_DOM_ID, Some(&list_row(list))),
        stream("replace", NEW_LIST_DOM_ID, Some(&form(&ListForm::blank()))),
        notice_stream(notice),
    ]
    .join("\n")
}

/// Row replaced in place, notice
pub fn updated_stream(list: &List, notice: &str) -> String {
    [
        stream("replace", &list_dom_id(list.id), Some(&list_row(list))),
        notice_stream(notice),
    ]
    .join("\n")
}

/// Row removed, notice
pub fn destroyed_stream(id: i64, notice: &str) -> String {
    [stream("remove", &list_dom_id(id), None), notice_stream(notice)].join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn list(id: i64, name: &str) -> List {
        let now = Utc::now();
        List {
            id,
            name: name.to_owned(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn escapes_markup() {
        assert_eq!(
            escape(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn index_renders_rows_in_given_order() {
        let html = index_page(&[list(2, "Second"), list(1, "First")], Some("Saved"));
        let second = html.find("Second").unwrap();
        let first = html.find("First").unwrap();
        assert!(second < first);
        assert!(html.contains(r#"<p class="notice">Saved</p>"#));
        assert!(html.contains(r#"id="list_2""#));
    }

    #[test]
    fn row_escapes_name() {
        let html = list_row(&list(5, "<script>alert(1)</script>"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn form_targets_depend_on_persistence() {
        let new_form = form(&ListForm::blank());
        assert!(new_form.contains(r#"action="/lists""#));
        assert!(new_form.contains("Create List"));

        let edit_form = form(&ListForm::for_list(&list(9, "Chores")));
        assert!(edit_form.contains(r#"action="/lists/9?_method=patch""#));
        assert!(edit_form.contains(r#"value="Chores""#));
    }

    #[test]
    fn rejected_form_keeps_input_and_error() {
        let params = ListParams {
            name: Some("   ".into()),
        };
        let err = ValidationError::Empty { field: "name" };
        let rejected = ListForm::rejected(Some(3), "Old", &params, &err);
        assert_eq!(rejected.name, "   ");
        assert_eq!(rejected.errors, vec!["Name can't be blank".to_owned()]);

        let html = form(&rejected);
        assert!(html.contains("Name can&#39;t be blank"));
    }

    #[test]
    fn streams() {
        let created = created_stream(&list(4, "Books"), "List successfully created.");
        assert!(created.contains(r#"<turbo-stream action="prepend" target="lists">"#));
        assert!(created.contains(r#"<turbo-stream action="update" target="flash">"#));

        let destroyed = destroyed_stream(4, "List successfully destroyed.");
        assert!(destroyed.contains(r#"<turbo-stream action="remove" target="list_4"></turbo-stream>"#));
        assert!(destroyed.contains("List successfully destroyed."));
    }
}
