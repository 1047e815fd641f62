// Output formatting and styling

use colored::Colorize;
use specflow_history::{Diff, Impact, Operation};

/// Output styling configuration
pub struct OutputStyle {
    pub use_colors: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_colors: atty::is(atty::Stream::Stdout),
        }
    }
}

impl OutputStyle {
    /// Plain output, for tests and pipes
    pub fn plain() -> Self {
        Self { use_colors: false }
    }

    /// Format success message
    pub fn success(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✓".green().bold(), msg)
        } else {
            format!("✓ {}", msg)
        }
    }

    /// Format error message
    pub fn error(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "✗".red().bold(), msg)
        } else {
            format!("✗ {}", msg)
        }
    }

    /// Format warning message
    pub fn warning(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "⚠".yellow(), msg)
        } else {
            format!("⚠ {}", msg)
        }
    }

    /// Format info message
    pub fn info(&self, msg: &str) -> String {
        if self.use_colors {
            format!("{} {}", "ℹ".blue(), msg)
        } else {
            format!("ℹ {}", msg)
        }
    }

    /// Format an identifier
    pub fn code(&self, code: &str) -> String {
        if self.use_colors {
            code.cyan().to_string()
        } else {
            code.to_string()
        }
    }

    /// Format header
    pub fn header(&self, title: &str) -> String {
        if self.use_colors {
            title.bold().to_string()
        } else {
            title.to_string()
        }
    }

    /// Format an impact level
    pub fn impact(&self, impact: Impact) -> String {
        let label = impact.to_string();
        if !self.use_colors {
            return label;
        }
        match impact {
            Impact::High => label.red().bold().to_string(),
            Impact::Medium => label.yellow().to_string(),
            Impact::Low => label.green().to_string(),
        }
    }

    /// One line per diff, e.g. `+ coder spec.capabilities[] "exec"`
    pub fn diff_line(&self, diff: &Diff) -> String {
        let (marker, value) = match diff.operation {
            Operation::Add => ("+", diff.after.as_ref()),
            Operation::Remove => ("-", diff.before.as_ref()),
            Operation::Modify => ("~", diff.after.as_ref()),
        };
        let value = match value {
            Some(v) => match v.as_text() {
                Some(text) => format!("{:?}", text),
                None => String::from("<agent>"),
            },
            None => String::new(),
        };
        let line = format!("{} {} {} {}", marker, diff.entity_name, diff.path, value);
        let line = line.trim_end().to_string();
        if !self.use_colors {
            return line;
        }
        match diff.operation {
            Operation::Add => line.green().to_string(),
            Operation::Remove => line.red().to_string(),
            Operation::Modify => line.yellow().to_string(),
        }
    }
}

pub fn print_success(msg: &str) {
    let style = OutputStyle::default();
    println!("{}", style.success(msg));
}

pub fn print_error(msg: &str) {
    let style = OutputStyle::default();
    eprintln!("{}", style.error(msg));
}

pub fn print_warning(msg: &str) {
    let style = OutputStyle::default();
    println!("{}", style.warning(msg));
}

pub fn print_info(msg: &str) {
    let style = OutputStyle::default();
    println!("{}", style.info(msg));
}
