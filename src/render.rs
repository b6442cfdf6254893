//! HTML rendering: the page frame, the operation forms, and the node's answer.
//!
//! Every response the cookbook produces is one full page built here. The
//! answer (or a local error) sits at the top, followed by the node URL forms
//! and one form per operation, grouped by section.
use std::fmt::Write as _;

use serde_json::Value;

use crate::catalog::{self, Operation, Param, Prefill, Section};
use crate::error::DispatchError;

pub const TITLE: &str = "Nexus Interactive SDK/API Cook Book";

/// Shown when a listing answer has a `result` key with nothing in it.
pub const NO_DATA: &str = r#"{"error": "no data returned"}"#;

/// Placed after the opening bracket and after every item of a listing answer.
pub const ITEM_SEPARATOR: &str = "<br><br>";

/// Start of a rendered listing, up to the first item.
pub const LIST_OPEN: &str = r#"{"result": ["#;

// ---------------------------------------------------------------------------
// Text helpers
// ---------------------------------------------------------------------------

pub fn green(s: &str) -> String {
    format!(r#"<font color="green">{s}</font>"#)
}

pub fn red(s: &str) -> String {
    format!(r#"<font color="red">{s}</font>"#)
}

pub fn blue(s: &str) -> String {
    format!(r#"<font color="blue">{s}</font>"#)
}

/// Turn terminal bold markers into `<b>` tags.
pub fn bold(s: &str) -> String {
    s.replace("[1m", "<b>").replace("[0m", "</b>")
}

pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

pub fn escape_attr(s: &str) -> String {
    escape_html(s).replace('"', "&quot;")
}

// ---------------------------------------------------------------------------
// Answers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Success,
    Error,
}

/// The message shown above the forms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub html: String,
    pub tone: Tone,
}

impl Notice {
    /// Wrap rendered answer text. Any error marker in the text turns the
    /// notice red.
    pub fn result(html: String) -> Self {
        let tone = if html.contains(r#""error":"#) {
            Tone::Error
        } else {
            Tone::Success
        };
        Self { html, tone }
    }

    pub fn error(err: &DispatchError) -> Self {
        Self {
            html: escape_html(&err.to_string()),
            tone: Tone::Error,
        }
    }

    fn to_html(&self) -> String {
        let text = bold(&self.html);
        match self.tone {
            Tone::Success => green(&text),
            Tone::Error => red(&text),
        }
    }
}

/// Compact JSON text, HTML-escaped.
pub fn render_json(value: &Value) -> String {
    escape_html(&value.to_string())
}

/// Like [`render_json`], but a `result` array is laid out one item per line.
pub fn render_list(value: &Value) -> String {
    let Some(result) = value.get("result") else {
        return render_json(value);
    };
    match result {
        Value::Null => NO_DATA.to_string(),
        Value::Array(items) => {
            let mut out = format!("{LIST_OPEN}{ITEM_SEPARATOR}");
            for item in items {
                out.push_str(&render_json(item));
                out.push_str(ITEM_SEPARATOR);
            }
            out.push_str("]}");
            out
        }
        _ => render_json(value),
    }
}

// ---------------------------------------------------------------------------
// Page
// ---------------------------------------------------------------------------

/// Everything in the page header that is not the answer itself.
#[derive(Debug, Clone)]
pub struct Frame {
    pub hostname: String,
    pub sdk_user: Option<String>,
    pub api_user: Option<String>,
    pub sdk_url: String,
    pub api_url: String,
}

/// Render a full page. `session` and `genesis` pre-fill the matching inputs.
pub fn page(frame: &Frame, notice: Option<&Notice>, session: &str, genesis: &str) -> String {
    let mut body = String::new();
    if let Some(notice) = notice {
        let _ = write!(
            body,
            "\n<br><table align=\"left\" style=\"word-break:break-all;\">\n\
             <tr><td>{}</td></tr>\n\
             </table><br>&nbsp;<br><hr size=\"5\">\n",
            notice.to_html()
        );
    }
    url_forms(&mut body, frame);
    for section in Section::PAGE_ORDER {
        section_forms(&mut body, section, session, genesis);
    }

    format!(
        r##"
    <html>
    <title>{TITLE}</title>
    <body bgcolor="gray">
    <div style="margin:20px;background-color:#F5F5F5;padding:15px;
         border-radius:20px;border:5px solid #666666;">
    <font face="verdana"><center>
    <br><head><a href="/" style="text-decoration:none;"><font color="black">
    <b>{TITLE}</b></a></head><br>

    <font size="2"><br>Running on {host}, last logged in SDK/API user {sdk}/{api}</font>
    <br><br><hr size="5">

    {body}

    <hr size="5"></center></font></body></html>
"##,
        host = blue(&escape_html(&frame.hostname)),
        sdk = blue(&user(frame.sdk_user.as_deref())),
        api = blue(&user(frame.api_user.as_deref())),
    )
}

/// The page shown for an unknown path.
pub fn not_found(path: &str) -> String {
    format!(
        "<html><title>{TITLE}</title><body><h3>Not found</h3>\
         <p>{} is not a cookbook route. <a href=\"/\">Back to the cook book</a></p>\
         </body></html>",
        escape_html(path)
    )
}

fn user(name: Option<&str>) -> String {
    escape_html(name.unwrap_or("None"))
}

fn url_forms(out: &mut String, frame: &Frame) {
    out.push_str("<br><b>Nexus Node URLs</b><br><br><table>");
    for (action, label, value) in [
        ("/url/sdk", "SDK", &frame.sdk_url),
        ("/url/api", "API", &frame.api_url),
    ] {
        let _ = write!(
            out,
            "\n<form action=\"{action}\" method=\"post\">\n\
             {label}:&nbsp;\n\
             <input type=\"text\" name=\"url\" value=\"{}\" size=\"30\" />\n\
             &nbsp;\n\
             <input type=\"submit\" value=\"Change URL\" name=\"action\" />\n\
             </form>\n",
            escape_attr(value)
        );
    }
    out.push_str("<br><br><hr size=\"5\">\n");
}

fn section_forms(out: &mut String, section: Section, session: &str, genesis: &str) {
    let _ = write!(out, "<br><b>{}</b><br><br><table>", section.title());

    // System forms have no inputs and fit on one row.
    if section == Section::System {
        out.push_str("<tr>");
        for (i, op) in catalog::by_section(section).enumerate() {
            if i > 0 {
                out.push_str("<td>&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;&nbsp;</td>");
            }
            let _ = write!(out, "<td>{}</td>", form(op, session, genesis));
        }
        out.push_str("</tr>");
    } else {
        for op in catalog::by_section(section) {
            let _ = write!(out, "<tr><td>{}</td></tr>", form(op, session, genesis));
        }
    }

    out.push_str("</table><br><hr size=\"5\">");
}

/// One operation's form: the remote path with its verb/noun highlighted,
/// followed by its query string with an input box per user field.
pub fn form(op: &Operation, session: &str, genesis: &str) -> String {
    let mut action = format!("/{}", op.route);
    if op.takes_route_session() && !session.is_empty() {
        action.push('/');
        action.push_str(session);
    }

    let mut out = format!(
        "<form action=\"{}\" method=\"post\">{}",
        escape_attr(&action),
        highlight(op.remote)
    );

    for (i, param) in op.params.iter().enumerate() {
        out.push(if i == 0 { '?' } else { '&' });
        match param {
            Param::Input { name, prefill } => {
                let value = match prefill {
                    Prefill::Blank => "",
                    Prefill::Literal(v) => *v,
                    Prefill::Session => session,
                    Prefill::Genesis => genesis,
                };
                let _ = write!(
                    out,
                    "{name}=<input type=\"text\" name=\"{name}\" value=\"{}\" size=\"15\" />",
                    escape_attr(value)
                );
            }
            Param::Fixed { name, value } => {
                let _ = write!(out, "{name}={value}");
            }
        }
    }

    if op.params.is_empty() {
        out.push_str("<br><br>");
    }
    out.push_str(
        "\n&nbsp;&nbsp;&nbsp;&nbsp;\n\
         <input type=\"submit\" value=\"SDK\" name=\"action\" />\n\
         &nbsp;\n\
         <input type=\"submit\" value=\"API\" name=\"action\" />\n\
         </form>\n",
    );
    out
}

/// `users/login/user` becomes `users/` followed by `login/user` in blue.
fn highlight(remote: &str) -> String {
    match remote.split_once('/') {
        Some((family, rest)) => format!("{family}/{}", blue(rest)),
        None => remote.to_string(),
    }
}
