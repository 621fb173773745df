//! ICU MessageFormat subset used by `t()`
//!
//! Supported syntax:
//! - `{name}` simple arguments
//! - `{n, number}`, `{n, number, integer}` and `{n, number, percent}`
//! - `{n, plural, offset:1 =0 {none} one {# item} other {# items}}`
//! - `{n, selectordinal, one {#st} two {#nd} few {#rd} other {#th}}`
//! - `{g, select, female {she} male {he} other {they}}`
//! - apostrophe quoting: `''` is a literal apostrophe and `'{...}'` is literal text
//!
//! A missing value leaves its placeholder untouched. A template that fails to
//! parse is returned verbatim.

use crate::intl::{
    format_number, get_plural_category, LocaleCode, NumberFormatOptions, PluralRuleType,
};

use super::types::{MessageValue, TranslationValues};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberStyle {
    Decimal,
    Integer,
    Percent,
}

#[derive(Debug, Clone, PartialEq)]
enum Selector {
    Exact(f64),
    Keyword(String),
}

#[derive(Debug, Clone, PartialEq)]
enum Node {
    Text(String),
    Pound,
    Argument {
        name: String,
        raw: String,
    },
    Number {
        name: String,
        style: NumberStyle,
        raw: String,
    },
    Plural {
        name: String,
        rule_type: PluralRuleType,
        offset: f64,
        branches: Vec<(Selector, Vec<Node>)>,
        raw: String,
    },
    Select {
        name: String,
        branches: Vec<(String, Vec<Node>)>,
        raw: String,
    },
}

#[derive(Debug)]
struct SyntaxError;

type ParseResult<T> = std::result::Result<T, SyntaxError>;

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.pos += 1;
        Some(ch)
    }

    fn expect(&mut self, ch: char) -> ParseResult<()> {
        match self.bump() {
            Some(c) if c == ch => Ok(()),
            _ => Err(SyntaxError),
        }
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn slice(&self, start: usize) -> String {
        self.chars[start..self.pos].iter().collect()
    }

    fn word(&mut self) -> String {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| !c.is_whitespace() && !matches!(c, ',' | '{' | '}'))
        {
            self.pos += 1;
        }
        self.slice(start)
    }

    /// Parse text and arguments until an unmatched `}` or the end of input
    fn parse_nodes(&mut self, in_plural: bool, nested: bool) -> ParseResult<Vec<Node>> {
        let mut nodes = Vec::new();
        let mut text = String::new();

        while let Some(ch) = self.peek() {
            match ch {
                '{' => {
                    if !text.is_empty() {
                        nodes.push(Node::Text(std::mem::take(&mut text)));
                    }
                    nodes.push(self.parse_argument(in_plural)?);
                }
                '}' if nested => break,
                '}' => return Err(SyntaxError),
                '#' if in_plural => {
                    self.pos += 1;
                    if !text.is_empty() {
                        nodes.push(Node::Text(std::mem::take(&mut text)));
                    }
                    nodes.push(Node::Pound);
                }
                '\'' => {
                    self.pos += 1;
                    self.parse_apostrophe(&mut text, in_plural);
                }
                _ => {
                    self.pos += 1;
                    text.push(ch);
                }
            }
        }

        if !text.is_empty() {
            nodes.push(Node::Text(text));
        }
        Ok(nodes)
    }

    /// Called just past an apostrophe
    fn parse_apostrophe(&mut self, text: &mut String, in_plural: bool) {
        match self.peek() {
            Some('\'') => {
                self.pos += 1;
                text.push('\'');
            }
            Some(c) if matches!(c, '{' | '}' | '|') || (c == '#' && in_plural) => {
                while let Some(c) = self.bump() {
                    if c == '\'' {
                        if self.peek() == Some('\'') {
                            self.pos += 1;
                            text.push('\'');
                        } else {
                            return;
                        }
                    } else {
                        text.push(c);
                    }
                }
            }
            _ => text.push('\''),
        }
    }

    fn parse_argument(&mut self, in_plural: bool) -> ParseResult<Node> {
        let start = self.pos;
        self.expect('{')?;
        self.skip_ws();
        let name = self.word();
        if name.is_empty() {
            return Err(SyntaxError);
        }
        self.skip_ws();

        match self.bump() {
            Some('}') => Ok(Node::Argument {
                name,
                raw: self.slice(start),
            }),
            Some(',') => {
                self.skip_ws();
                let kind = self.word();
                self.skip_ws();
                match kind.as_str() {
                    "number" => self.parse_number(name, start),
                    "plural" => self.parse_plural(name, PluralRuleType::Cardinal, start),
                    "selectordinal" => self.parse_plural(name, PluralRuleType::Ordinal, start),
                    "select" => self.parse_select(name, start, in_plural),
                    _ => Err(SyntaxError),
                }
            }
            _ => Err(SyntaxError),
        }
    }

    fn parse_number(&mut self, name: String, start: usize) -> ParseResult<Node> {
        let style = match self.bump() {
            Some('}') => NumberStyle::Decimal,
            Some(',') => {
                self.skip_ws();
                let style = match self.word().as_str() {
                    "integer" => NumberStyle::Integer,
                    "percent" => NumberStyle::Percent,
                    _ => NumberStyle::Decimal,
                };
                self.skip_ws();
                self.expect('}')?;
                style
            }
            _ => return Err(SyntaxError),
        };
        Ok(Node::Number {
            name,
            style,
            raw: self.slice(start),
        })
    }

    fn parse_plural(
        &mut self,
        name: String,
        rule_type: PluralRuleType,
        start: usize,
    ) -> ParseResult<Node> {
        self.expect(',')?;
        self.skip_ws();

        let mut offset = 0.0;
        if self.chars[self.pos..].starts_with(&['o', 'f', 'f', 's', 'e', 't', ':']) {
            self.pos += "offset:".len();
            self.skip_ws();
            offset = self.word().parse().map_err(|_| SyntaxError)?;
            self.skip_ws();
        }

        let mut branches = Vec::new();
        while self.peek() != Some('}') {
            let key = self.word();
            let selector = match key.strip_prefix('=') {
                Some(exact) => Selector::Exact(exact.parse().map_err(|_| SyntaxError)?),
                None if !key.is_empty() => Selector::Keyword(key),
                None => return Err(SyntaxError),
            };
            self.skip_ws();
            let body = self.parse_branch(true)?;
            branches.push((selector, body));
            self.skip_ws();
        }
        self.expect('}')?;

        if !branches
            .iter()
            .any(|(s, _)| *s == Selector::Keyword("other".to_string()))
        {
            return Err(SyntaxError);
        }

        Ok(Node::Plural {
            name,
            rule_type,
            offset,
            branches,
            raw: self.slice(start),
        })
    }

    fn parse_select(&mut self, name: String, start: usize, in_plural: bool) -> ParseResult<Node> {
        self.expect(',')?;
        self.skip_ws();

        let mut branches = Vec::new();
        while self.peek() != Some('}') {
            let key = self.word();
            if key.is_empty() {
                return Err(SyntaxError);
            }
            self.skip_ws();
            let body = self.parse_branch(in_plural)?;
            branches.push((key, body));
            self.skip_ws();
        }
        self.expect('}')?;

        if !branches.iter().any(|(k, _)| k == "other") {
            return Err(SyntaxError);
        }

        Ok(Node::Select {
            name,
            branches,
            raw: self.slice(start),
        })
    }

    fn parse_branch(&mut self, in_plural: bool) -> ParseResult<Vec<Node>> {
        self.expect('{')?;
        let nodes = self.parse_nodes(in_plural, true)?;
        self.expect('}')?;
        Ok(nodes)
    }
}

fn parse(template: &str) -> ParseResult<Vec<Node>> {
    let mut parser = Parser::new(template);
    let nodes = parser.parse_nodes(false, false)?;
    if parser.peek().is_some() {
        return Err(SyntaxError);
    }
    Ok(nodes)
}

struct Renderer<'a> {
    locale: &'a LocaleCode,
    values: Option<&'a TranslationValues>,
}

impl Renderer<'_> {
    fn value(&self, name: &str) -> Option<&MessageValue> {
        self.values.and_then(|values| values.get(name))
    }

    fn number(&self, value: f64, style: NumberStyle) -> String {
        let options = match style {
            NumberStyle::Decimal => NumberFormatOptions::decimal(),
            NumberStyle::Integer => NumberFormatOptions::decimal().with_fraction_digits(0, 0),
            NumberStyle::Percent => NumberFormatOptions::percent(),
        };
        format_number(value, self.locale, Some(&options)).unwrap_or_else(|_| value.to_string())
    }

    fn render(&self, nodes: &[Node], pound: Option<&str>, out: &mut String) {
        for node in nodes {
            match node {
                Node::Text(text) => out.push_str(text),
                Node::Pound => out.push_str(pound.unwrap_or("#")),
                Node::Argument { name, raw } => match self.value(name) {
                    Some(MessageValue::Number(n)) => {
                        out.push_str(&self.number(*n, NumberStyle::Decimal))
                    }
                    Some(value) => out.push_str(&value.to_string()),
                    None => out.push_str(raw),
                },
                Node::Number { name, style, raw } => {
                    match self.value(name).and_then(MessageValue::as_number) {
                        Some(n) => out.push_str(&self.number(n, *style)),
                        None => out.push_str(raw),
                    }
                }
                Node::Plural {
                    name,
                    rule_type,
                    offset,
                    branches,
                    raw,
                } => {
                    let Some(n) = self.value(name).and_then(MessageValue::as_number) else {
                        out.push_str(raw);
                        continue;
                    };
                    let adjusted = n - offset;
                    let exact = branches
                        .iter()
                        .find(|(s, _)| matches!(s, Selector::Exact(v) if *v == n));
                    let chosen = exact.or_else(|| {
                        let category = get_plural_category(adjusted, self.locale, Some(*rule_type))
                            .ok()?
                            .as_str();
                        branches.iter().find(
                            |(s, _)| matches!(s, Selector::Keyword(k) if k.as_str() == category),
                        )
                    });
                    let chosen = chosen.or_else(|| {
                        branches
                            .iter()
                            .find(|(s, _)| matches!(s, Selector::Keyword(k) if k == "other"))
                    });
                    match chosen {
                        Some((_, body)) => {
                            let formatted = self.number(adjusted, NumberStyle::Decimal);
                            self.render(body, Some(&formatted), out);
                        }
                        None => out.push_str(raw),
                    }
                }
                Node::Select {
                    name,
                    branches,
                    raw,
                } => {
                    let Some(value) = self.value(name) else {
                        out.push_str(raw);
                        continue;
                    };
                    let key = value.to_string();
                    let chosen = branches
                        .iter()
                        .find(|(k, _)| *k == key)
                        .or_else(|| branches.iter().find(|(k, _)| k == "other"));
                    match chosen {
                        Some((_, body)) => self.render(body, pound, out),
                        None => out.push_str(raw),
                    }
                }
            }
        }
    }
}

/// Render `template` with `values` under `locale` conventions
pub fn format_message(
    template: &str,
    values: Option<&TranslationValues>,
    locale: &LocaleCode,
) -> String {
    let Ok(nodes) = parse(template) else {
        return template.to_string();
    };
    let renderer = Renderer { locale, values };
    let mut out = String::with_capacity(template.len());
    renderer.render(&nodes, None, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::types::values;

    fn en() -> LocaleCode {
        LocaleCode::parse("en").unwrap()
    }

    fn render(template: &str, vals: &TranslationValues) -> String {
        format_message(template, Some(vals), &en())
    }

    #[test]
    fn test_plain_text_and_arguments() {
        let vals = values([("name", "Ana")]);
        assert_eq!(render("Hello {name}!", &vals), "Hello Ana!");
        assert_eq!(render("Hello { name }!", &vals), "Hello Ana!");
        assert_eq!(format_message("No args", None, &en()), "No args");
    }

    #[test]
    fn test_missing_values_keep_placeholder() {
        let vals = values([("name", "Ana")]);
        assert_eq!(render("Hi {name}, {missing}", &vals), "Hi Ana, {missing}");
        assert_eq!(
            format_message("{n, plural, one {# item} other {# items}}", None, &en()),
            "{n, plural, one {# item} other {# items}}"
        );
    }

    #[test]
    fn test_number_arguments() {
        let vals = values([("n", 1234.5)]);
        assert_eq!(render("{n, number}", &vals), "1,234.5");
        assert_eq!(render("{n, number, integer}", &vals), "1,235");
        assert_eq!(render("{n}", &vals), "1,234.5");
        let es = LocaleCode::parse("es").unwrap();
        assert_eq!(format_message("{n, number}", Some(&values([("n", 12345.5)])), &es), "12.345,5");
    }

    #[test]
    fn test_plural() {
        let template = "{count, plural, =0 {no items} one {# item} other {# items}}";
        assert_eq!(render(template, &values([("count", 0)])), "no items");
        assert_eq!(render(template, &values([("count", 1)])), "1 item");
        assert_eq!(render(template, &values([("count", 1200)])), "1,200 items");
    }

    #[test]
    fn test_plural_offset() {
        let template =
            "{n, plural, offset:1 =0 {nobody} =1 {{host}} one {{host} and # other} other {{host} and # others}}";
        let base = |n: i32| values([("n", MessageValue::from(n)), ("host", "Ana".into())]);
        assert_eq!(render(template, &base(0)), "nobody");
        assert_eq!(render(template, &base(1)), "Ana");
        assert_eq!(render(template, &base(2)), "Ana and 1 other");
        assert_eq!(render(template, &base(5)), "Ana and 4 others");
    }

    #[test]
    fn test_selectordinal() {
        let template = "{pos, selectordinal, one {#st} two {#nd} few {#rd} other {#th}}";
        assert_eq!(render(template, &values([("pos", 1)])), "1st");
        assert_eq!(render(template, &values([("pos", 22)])), "22nd");
        assert_eq!(render(template, &values([("pos", 13)])), "13th");
    }

    #[test]
    fn test_select_nested_in_plural() {
        let template = "{g, select, female {{n, plural, one {she has # cat} other {she has # cats}}} other {they have #}}";
        let vals = values([("g", MessageValue::from("female")), ("n", 2.into())]);
        assert_eq!(render(template, &vals), "she has 2 cats");
        let vals = values([("g", MessageValue::from("x")), ("n", 2.into())]);
        assert_eq!(render(template, &vals), "they have #");
    }

    #[test]
    fn test_apostrophe_escaping() {
        let vals = values([("name", "Ana")]);
        assert_eq!(render("It''s {name}", &vals), "It's Ana");
        assert_eq!(render("Use '{name}' literally", &vals), "Use {name} literally");
        assert_eq!(render("don't", &vals), "don't");
    }

    #[test]
    fn test_malformed_templates_are_verbatim() {
        let vals = values([("n", 1)]);
        assert_eq!(render("Broken {n", &vals), "Broken {n");
        assert_eq!(render("Stray } brace", &vals), "Stray } brace");
        assert_eq!(render("{n, plural, one {x}}", &vals), "{n, plural, one {x}}");
        assert_eq!(render("{n, bogus}", &vals), "{n, bogus}");
    }
}
