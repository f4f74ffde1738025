//! Subject/body format strings.
//!
//! Templates use `{field}` placeholders with `{{` and `}}` as literal
//! braces. Only the three fields in [`TemplateVars`] exist.

use crate::error::TemplateError;

/// Field names a template may reference.
pub const FIELDS: [&str; 3] = ["bot_nick", "nick", "channel"];

/// Values substituted into a notification template.
#[derive(Debug, Clone, Copy)]
pub struct TemplateVars<'a> {
    pub bot_nick: &'a str,
    pub nick: &'a str,
    pub channel: &'a str,
}

impl<'a> TemplateVars<'a> {
    fn lookup(&self, field: &str) -> Option<&'a str> {
        match field {
            "bot_nick" => Some(self.bot_nick),
            "nick" => Some(self.nick),
            "channel" => Some(self.channel),
            _ => None,
        }
    }
}

/// Render `template`, replacing each `{field}` with its value.
pub fn render(template: &str, vars: &TemplateVars<'_>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    let mut offset = 0;

    while let Some(pos) = rest.find(['{', '}']) {
        out.push_str(&rest[..pos]);
        let brace = rest[pos..].chars().next().unwrap_or('{');
        let after = &rest[pos + 1..];

        if after.starts_with(brace) {
            out.push(brace);
            offset += pos + 2;
            rest = &after[1..];
            continue;
        }
        if brace == '}' {
            return Err(TemplateError::UnbalancedBrace {
                brace,
                position: offset + pos,
            });
        }

        let Some(close) = after.find('}') else {
            return Err(TemplateError::UnbalancedBrace {
                brace,
                position: offset + pos,
            });
        };
        let field = &after[..close];
        let value = vars
            .lookup(field)
            .ok_or_else(|| TemplateError::UnknownField(field.to_string()))?;
        out.push_str(value);
        offset += pos + close + 2;
        rest = &after[close + 1..];
    }

    out.push_str(rest);
    Ok(out)
}

/// Check that `template` renders, without caring about the result.
pub fn check(template: &str) -> Result<(), TemplateError> {
    let probe = TemplateVars {
        bot_nick: "",
        nick: "",
        channel: "",
    };
    render(template, &probe).map(|_| ())
}
