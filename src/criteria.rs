//! Command criteria construction
//!
//! sway commands can be prefixed with `[field=value ...]` to select the
//! containers they apply to. [`Criteria`] builds such a prefix with the
//! escaping the command parser expects. This is plain string formatting on
//! top of [`Connection::run_command`](crate::Connection::run_command); the
//! compositor itself reports whether the criteria matched anything.

use std::fmt;

/// Magic criteria value selecting the currently focused container's value
///
/// ```ignore
/// conn.run_command(&format!("{} kill", Criteria::new().con_id(FOCUSED)))?;
/// ```
pub const FOCUSED: &str = "__focused__";

/// Builder for a `[field=value ...]` command prefix
#[derive(Debug, Clone, Default)]
pub struct Criteria {
    floating: bool,
    tiling: bool,
    fields: Vec<(&'static str, String)>,
}

/// Escape the characters the criteria parser treats specially
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '[' | ']' | '"' | '\'') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl Criteria {
    pub fn new() -> Self {
        Self::default()
    }

    fn field(mut self, name: &'static str, value: impl fmt::Display) -> Self {
        self.fields.push((name, value.to_string()));
        self
    }

    fn text_field(self, name: &'static str, value: impl AsRef<str>) -> Self {
        self.field(name, escape(value.as_ref()))
    }

    /// Match only floating containers
    pub fn floating(mut self) -> Self {
        self.floating = true;
        self
    }

    /// Match only tiling containers
    pub fn tiling(mut self) -> Self {
        self.tiling = true;
        self
    }

    /// Match the Wayland app id
    pub fn app_id(self, value: impl AsRef<str>) -> Self {
        self.text_field("app_id", value)
    }

    /// Match the compositor-assigned container id, or [`FOCUSED`]
    pub fn con_id(self, value: impl fmt::Display) -> Self {
        self.field("con_id", value)
    }

    /// Match containers carrying a mark
    pub fn con_mark(self, value: impl AsRef<str>) -> Self {
        self.text_field("con_mark", value)
    }

    pub fn pid(self, value: i32) -> Self {
        self.field("pid", value)
    }

    pub fn shell(self, value: impl AsRef<str>) -> Self {
        self.text_field("shell", value)
    }

    /// Match the window title against a regex
    pub fn title(self, value: impl AsRef<str>) -> Self {
        self.text_field("title", value)
    }

    pub fn urgent(self, value: impl AsRef<str>) -> Self {
        self.text_field("urgent", value)
    }

    /// Match the workspace a container is on, by name or number
    pub fn workspace(self, value: impl fmt::Display) -> Self {
        self.field("workspace", escape(&value.to_string()))
    }

    /// Match the X11 window class of an Xwayland view
    pub fn x11_class(self, value: impl AsRef<str>) -> Self {
        self.text_field("class", value)
    }

    /// Match the X11 window id of an Xwayland view
    pub fn x11_id(self, value: i64) -> Self {
        self.field("id", value)
    }

    pub fn x11_instance(self, value: impl AsRef<str>) -> Self {
        self.text_field("instance", value)
    }

    pub fn x11_window_role(self, value: impl AsRef<str>) -> Self {
        self.text_field("window_role", value)
    }

    pub fn x11_window_type(self, value: impl AsRef<str>) -> Self {
        self.text_field("window_type", value)
    }
}

impl fmt::Display for Criteria {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        let mut first = true;
        let mut sep = |f: &mut fmt::Formatter<'_>| {
            if first {
                first = false;
                Ok(())
            } else {
                write!(f, " ")
            }
        };
        if self.floating {
            sep(f)?;
            write!(f, "floating")?;
        }
        if self.tiling {
            sep(f)?;
            write!(f, "tiling")?;
        }
        for (name, value) in &self.fields {
            sep(f)?;
            write!(f, "{name}={value}")?;
        }
        write!(f, "]")
    }
}
