//! Markdown sections for named content

use std::fmt::Display;
use std::io::{self, Write};

/// Write a top-level `# title` heading followed by a blank line
pub fn print_heading<W: Write + ?Sized>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "# {title}")?;
    writeln!(out)
}

/// Write one `## name` section per entry, in iteration order: the header, a
/// blank line, the content's `Display` rendering and another blank line.
pub fn print_sections<W, I, K, V>(out: &mut W, sections: I) -> io::Result<()>
where
    W: Write + ?Sized,
    I: IntoIterator<Item = (K, V)>,
    K: Display,
    V: Display,
{
    for (name, content) in sections {
        writeln!(out, "## {name}")?;
        writeln!(out)?;
        writeln!(out, "{content}")?;
        writeln!(out)?;
    }
    Ok(())
}

/// Same output as [`print_sections`], as a string
pub fn render_sections<I, K, V>(sections: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: Display,
    V: Display,
{
    let mut buffer = Vec::new();
    // Writing to a Vec cannot fail
    let _ = print_sections(&mut buffer, sections);
    String::from_utf8_lossy(&buffer).into_owned()
}
