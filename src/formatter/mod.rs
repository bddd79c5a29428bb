use crate::entities::Posting;

/// Neither source publishes these as structured data, so the message points
/// the reader at the original listing instead.
pub const WORK_FORMAT_HINT: &str = "Remote / Office (check job link)";
pub const LANGUAGE_LEVEL_HINT: &str = "English or German (check job link)";
pub const COMPENSATION_HINT: &str = "Not specified";

/// Render a posting as a Telegram (legacy) Markdown message.
pub fn format_posting(posting: &Posting) -> String {
    format!(
        "📝 {title}\n\
         🏢 Company: {company}\n\
         📍 Location: {location}\n\
         💼 Work format: {work_format}\n\
         🗣 Language level: {language_level}\n\
         💰 Compensation: {compensation}\n\
         📄 Description: {description}\n\
         🔗 [Link to job]({link})",
        title = bold(posting.title()),
        company = escape_markdown(posting.company()),
        location = escape_markdown(posting.location()),
        work_format = WORK_FORMAT_HINT,
        language_level = LANGUAGE_LEVEL_HINT,
        compensation = COMPENSATION_HINT,
        description = escape_markdown(posting.description()),
        link = escape_link(posting.link().as_str()),
    )
}

fn is_control(c: char) -> bool {
    matches!(c, '_' | '*' | '`' | '[')
}

/// Escape the four control characters for use outside of an entity.
pub fn escape_markdown(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if is_control(c) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

/// Bold text in legacy Markdown. Nothing can be escaped inside an entity, so
/// the entity is closed before each control character and reopened after it:
/// `Designer*in` becomes `*Designer*\**in*`.
pub fn bold(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 4);
    let mut run = String::new();
    for c in text.chars() {
        if is_control(c) {
            push_bold_run(&mut out, &mut run);
            out.push('\\');
            out.push(c);
        } else {
            run.push(c);
        }
    }
    push_bold_run(&mut out, &mut run);
    out
}

fn push_bold_run(out: &mut String, run: &mut String) {
    if !run.is_empty() {
        out.push('*');
        out.push_str(run);
        out.push('*');
        run.clear();
    }
}

/// A `)` inside the URL would end the link entity early.
fn escape_link(url: &str) -> String {
    url.replace(')', "%29")
}
