use std::{fmt, iter::Peekable, mem, str::Chars};

use proc_macro2::{Delimiter, Spacing, TokenStream, TokenTree};

use crate::ast;

pub(crate) type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug)]
pub(crate) struct Error {
    msg: String,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.msg, f)
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) enum Derive {
    Args,
    Value,
    Group,
}

pub(crate) fn parse(ts: TokenStream, derive: Derive) -> Result<ast::Item> {
    let mut p = Parser::new(ts);
    match derive {
        Derive::Args => args(&mut p).map(ast::Item::Args),
        Derive::Value => value_enum(&mut p).map(ast::Item::Value),
        Derive::Group => group_struct(&mut p).map(ast::Item::Group),
    }
}

macro_rules! format_err {
    ($($tt:tt)*) => {
        Error { msg: format!($($tt)*) }
    };
}

macro_rules! bail {
    ($($tt:tt)*) => {
        return Err(format_err!($($tt)*))
    };
}

fn args(p: &mut Parser) -> Result<ast::Args> {
    let name = item_name(p, "struct", "Args")?;
    let fields = fields(p)?;
    Ok(ast::Args { name, fields })
}

fn group_struct(p: &mut Parser) -> Result<ast::GroupStruct> {
    let name = item_name(p, "struct", "Group")?;
    let fields = fields(p)?;
    if let Some(field) = fields.iter().find(|it| !it.params.is_empty()) {
        bail!("parameter attributes are not allowed on group field `{}`", field.name)
    }
    Ok(ast::GroupStruct { name, fields })
}

fn value_enum(p: &mut Parser) -> Result<ast::ValueEnum> {
    let name = item_name(p, "enum", "Value")?;
    let mut variants = Vec::new();
    p.enter_delim(Delimiter::Brace)?;
    while !p.end() {
        while p.eat_punct('#') {
            p.expect_group(Delimiter::Bracket)?;
        }
        let variant = p.expect_ident()?;
        if p.at_delim(Delimiter::Parenthesis) || p.at_delim(Delimiter::Brace) {
            bail!("`#[derive(Value)]` needs unit variants, `{}` has fields", variant)
        }
        if p.eat_punct('=') {
            while !p.end() && !p.at_punct(',') {
                p.bump();
            }
        }
        variants.push(variant);
        if !p.end() {
            p.expect_punct(',')?;
        }
    }
    p.exit_delim()?;
    if variants.is_empty() {
        bail!("`#[derive(Value)]` needs at least one variant in `{}`", name)
    }
    Ok(ast::ValueEnum { name, variants })
}

/// Skips outer attributes and visibility, returning the item's name.
fn item_name(p: &mut Parser, keyword: &str, derive: &str) -> Result<String> {
    while p.eat_punct('#') {
        p.expect_group(Delimiter::Bracket)?;
    }
    opt_vis(p);
    if !p.eat_keyword(keyword) {
        bail!("`#[derive({})]` only supports {} items", derive, keyword)
    }
    let name = p.expect_ident()?;
    if p.at_punct('<') {
        bail!("`#[derive({})]` does not support generic types like `{}`", derive, name)
    }
    Ok(name)
}

fn opt_vis(p: &mut Parser) {
    if p.eat_keyword("pub") && p.at_delim(Delimiter::Parenthesis) {
        p.bump();
    }
}

fn fields(p: &mut Parser) -> Result<Vec<ast::Field>> {
    if !p.at_delim(Delimiter::Brace) {
        bail!("expected a struct with named fields")
    }
    p.enter_delim(Delimiter::Brace)?;
    let mut res = Vec::new();
    while !p.end() {
        let mut doc = Vec::new();
        let mut params = Vec::new();
        while p.eat_punct('#') {
            let mut attr = Parser::new(p.expect_group(Delimiter::Bracket)?);
            let kind = match attr.expect_ident()?.as_str() {
                "doc" => {
                    attr.expect_punct('=')?;
                    let line = attr.expect_string()?;
                    doc.push(line.strip_prefix(' ').unwrap_or(&line).to_string());
                    continue;
                }
                "binary_path" => ast::Kind::BinaryPath,
                "switch" => ast::Kind::Switch,
                "argument" => ast::Kind::Argument,
                "completer" => ast::Kind::Completer,
                "register_completer" => ast::Kind::RegisterCompleter,
                _ => continue,
            };
            params.push(param_options(&mut attr, kind)?);
        }
        opt_vis(p);
        let name = p.expect_ident()?;
        p.expect_punct(':')?;
        let ty = ty(p);
        if !p.end() {
            p.expect_punct(',')?;
        }

        let doc = doc.join("\n").trim().to_string();
        res.push(ast::Field {
            name,
            list: is_list(&ty),
            ty: ty.into_iter().collect::<TokenStream>().to_string(),
            doc: if doc.is_empty() { None } else { Some(doc) },
            params,
        });
    }
    p.exit_delim()?;
    Ok(res)
}

/// Type tokens up to the next top-level comma.
fn ty(p: &mut Parser) -> Vec<TokenTree> {
    let mut res = Vec::new();
    let mut depth = 0usize;
    let mut arrow = false;
    while let Some(tt) = p.ts.last() {
        if let TokenTree::Punct(punct) = tt {
            match punct.as_char() {
                ',' if depth == 0 => break,
                '<' => depth += 1,
                '>' if !arrow => depth = depth.saturating_sub(1),
                _ => (),
            }
            arrow = punct.as_char() == '-' && punct.spacing() == Spacing::Joint;
        } else {
            arrow = false;
        }
        res.extend(p.ts.pop());
    }
    res
}

/// `Vec<_>`, `VecDeque<_>`, or either of them inside `Option<_>`.
fn is_list(ty: &[TokenTree]) -> bool {
    match generic(ty) {
        Some(("Vec" | "VecDeque", _)) => true,
        Some(("Option", inner)) => matches!(generic(inner), Some(("Vec" | "VecDeque", _))),
        _ => false,
    }
}

/// Splits `a::b::Name<Inner>` into `("Name", Inner)`.
fn generic(ty: &[TokenTree]) -> Option<(&str, &[TokenTree])> {
    let open = ty.iter().position(|tt| matches!(tt, TokenTree::Punct(p) if p.as_char() == '<'))?;
    let name = match ty[..open].last()? {
        TokenTree::Ident(ident) => ident.to_string(),
        _ => return None,
    };
    let close = match ty.last()? {
        TokenTree::Punct(p) if p.as_char() == '>' => ty.len() - 1,
        _ => return None,
    };
    let name = ["Vec", "VecDeque", "Option"].into_iter().find(|it| *it == name)?;
    Some((name, &ty[open + 1..close]))
}

fn param_options(p: &mut Parser, kind: ast::Kind) -> Result<ast::Param> {
    let mut res = ast::Param::new(kind);
    if p.end() {
        return Ok(res);
    }
    if kind == ast::Kind::BinaryPath {
        bail!("`binary_path` takes no options")
    }
    p.enter_delim(Delimiter::Parenthesis)?;
    if p.at_string() {
        res.switch = Some(p.expect_string()?);
        if !p.end() {
            p.expect_punct(',')?;
        }
    }
    while !p.end() {
        let option = p.expect_ident()?;
        match (kind, option.as_str()) {
            (_, "description") => res.description = Some(string_value(p)?),
            (_, "case_sensitive") => res.case_sensitive = true,
            (ast::Kind::Switch, _) => bail!("unknown switch option `{}`", option),
            (_, "required") => res.required = true,
            (_, "floating") => res.floating = true,
            (_, "remainder") => res.remainder = true,
            (_, "complete_files") => res.complete_files = true,
            (_, "complete_directories") => res.complete_directories = true,
            (_, "short_name") => res.short_name = Some(string_value(p)?),
            (_, "delimiters") => res.delimiters = Some(string_value(p)?),
            (_, "properties") => res.properties = string_list(p)?,
            (_, "complete_with") => res.complete_with = Some(string_list(p)?),
            (ast::Kind::RegisterCompleter, "command_name") => {
                res.command_name = Some(string_value(p)?)
            }
            _ => bail!("unknown argument option `{}`", option),
        }
        if !p.end() {
            p.expect_punct(',')?;
        }
    }
    p.exit_delim()?;
    Ok(res)
}

fn string_value(p: &mut Parser) -> Result<String> {
    p.expect_punct('=')?;
    p.expect_string()
}

fn string_list(p: &mut Parser) -> Result<Vec<String>> {
    let mut res = Vec::new();
    p.enter_delim(Delimiter::Parenthesis)?;
    while !p.end() {
        res.push(p.expect_string()?);
        if !p.end() {
            p.expect_punct(',')?;
        }
    }
    p.exit_delim()?;
    Ok(res)
}

struct Parser {
    stack: Vec<Vec<TokenTree>>,
    ts: Vec<TokenTree>,
}

impl Parser {
    fn new(ts: TokenStream) -> Self {
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        Self { stack: Vec::new(), ts }
    }

    fn bump(&mut self) {
        self.ts.pop();
    }

    fn at_delim(&self, delimiter: Delimiter) -> bool {
        match self.ts.last() {
            Some(TokenTree::Group(g)) => g.delimiter() == delimiter,
            _ => false,
        }
    }
    fn enter_delim(&mut self, delimiter: Delimiter) -> Result<()> {
        let ts = self.expect_group(delimiter)?;
        let mut ts = ts.into_iter().collect::<Vec<_>>();
        ts.reverse();
        let ts = mem::replace(&mut self.ts, ts);
        self.stack.push(ts);
        Ok(())
    }
    fn exit_delim(&mut self) -> Result<()> {
        if !self.end() {
            bail!("unexpected `{}`", self.ts[self.ts.len() - 1])
        }
        match self.stack.pop() {
            Some(ts) => self.ts = ts,
            None => bail!("unbalanced delimiters"),
        }
        Ok(())
    }
    fn expect_group(&mut self, delimiter: Delimiter) -> Result<TokenStream> {
        match self.ts.pop() {
            Some(TokenTree::Group(g)) if g.delimiter() == delimiter => Ok(g.stream()),
            _ => {
                let expected = match delimiter {
                    Delimiter::Parenthesis => "(",
                    Delimiter::Brace => "{",
                    Delimiter::Bracket => "[",
                    Delimiter::None => "group",
                };
                bail!("expected `{}`", expected)
            }
        }
    }
    fn end(&self) -> bool {
        self.ts.last().is_none()
    }

    fn eat_keyword(&mut self, kw: &str) -> bool {
        if self.at_keyword(kw) {
            self.bump();
            true
        } else {
            false
        }
    }
    fn at_keyword(&self, kw: &str) -> bool {
        match self.ts.last() {
            Some(TokenTree::Ident(ident)) => ident == kw,
            _ => false,
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Ident(ident)) => Ok(ident.to_string()),
            Some(tt) => bail!("expected an identifier, got: `{}`", tt),
            None => bail!("expected an identifier"),
        }
    }

    fn expect_punct(&mut self, punct: char) -> Result<()> {
        if !self.eat_punct(punct) {
            bail!("expected `{}`", punct)
        }
        Ok(())
    }
    fn eat_punct(&mut self, punct: char) -> bool {
        if self.at_punct(punct) {
            self.bump();
            true
        } else {
            false
        }
    }
    fn at_punct(&self, punct: char) -> bool {
        match self.ts.last() {
            Some(TokenTree::Punct(p)) => p.as_char() == punct,
            _ => false,
        }
    }

    fn at_string(&self) -> bool {
        match self.ts.last() {
            Some(TokenTree::Literal(lit)) => unquote(&lit.to_string()).is_some(),
            _ => false,
        }
    }
    fn expect_string(&mut self) -> Result<String> {
        match self.ts.pop() {
            Some(TokenTree::Literal(lit)) => {
                let text = lit.to_string();
                unquote(&text).ok_or_else(|| format_err!("expected a string, got: `{}`", text))
            }
            _ => bail!("expected a string"),
        }
    }
}

/// The value of a string literal, raw or escaped.
fn unquote(text: &str) -> Option<String> {
    if let Some(raw) = text.strip_prefix('r') {
        let hashes = raw.len() - raw.trim_start_matches('#').len();
        let body = raw.get(hashes..raw.len().checked_sub(hashes)?)?;
        return body.strip_prefix('"')?.strip_suffix('"').map(String::from);
    }
    let body = text.strip_prefix('"')?.strip_suffix('"')?;
    let mut res = String::new();
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            res.push(c);
            continue;
        }
        match chars.next()? {
            'n' => res.push('\n'),
            't' => res.push('\t'),
            'r' => res.push('\r'),
            '0' => res.push('\0'),
            'u' => res.push(unicode_escape(&mut chars)?),
            '\n' => {
                while chars.peek().map_or(false, |it| it.is_whitespace()) {
                    chars.next();
                }
            }
            c @ ('\\' | '"' | '\'') => res.push(c),
            _ => return None,
        }
    }
    Some(res)
}

fn unicode_escape(chars: &mut Peekable<Chars<'_>>) -> Option<char> {
    if chars.next()? != '{' {
        return None;
    }
    let hex = chars.by_ref().take_while(|&it| it != '}').collect::<String>();
    char::from_u32(u32::from_str_radix(&hex, 16).ok()?)
}
