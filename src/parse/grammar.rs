use winnow::ascii::{dec_int, till_line_ending};
use winnow::combinator::{alt, cut_err, opt, repeat, terminated};
use winnow::error::{ErrMode, ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, take_while};

use crate::{Condition, Group, LogicOperator, Value};

enum Entry {
    Item(Condition),
    Group(Group),
}

// -- Whitespace & comments --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    let _: () = repeat(
        0..,
        alt((
            take_while(1.., |c: char| c.is_ascii_whitespace()).void(),
            ('#', till_line_ending).void(),
        )),
    )
    .parse_next(input)?;
    Ok(())
}

/// Optional comma between entries.
fn separator(input: &mut &str) -> ModalResult<()> {
    ws.parse_next(input)?;
    opt(',').parse_next(input)?;
    Ok(())
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1.., |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., |c: char| {
            c.is_ascii_alphanumeric() || c == '_' || c == '.'
        }),
    )
        .take()
        .parse_next(input)
}

// -- Values -----------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    '"'.parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = any.parse_next(input)?;
        match ch {
            '"' => return Ok(s),
            '\\' => {
                let esc = any.parse_next(input)?;
                match esc {
                    '"' => s.push('"'),
                    '\\' => s.push('\\'),
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn negative_number(input: &mut &str) -> ModalResult<Value> {
    let neg_str = (
        '-',
        take_while(1.., |c: char| c.is_ascii_digit() || c == '.'),
    )
        .take()
        .parse_next(input)?;
    if neg_str.contains('.') {
        let f: f64 = neg_str
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Float(f))
    } else {
        let i: i64 = neg_str
            .parse()
            .map_err(|_| ErrMode::from_input(input).cut())?;
        Ok(Value::Int(i))
    }
}

fn float_literal(input: &mut &str) -> ModalResult<f64> {
    // Only match floats that contain a decimal point
    (
        take_while(1.., |c: char| c.is_ascii_digit()),
        '.',
        take_while(1.., |c: char| c.is_ascii_digit()),
    )
        .take()
        .try_map(|s: &str| s.parse::<f64>())
        .parse_next(input)
}

fn value(input: &mut &str) -> ModalResult<Value> {
    ws.parse_next(input)?;
    alt((
        string_literal.map(Value::String),
        "true".value(Value::Bool(true)),
        "false".value(Value::Bool(false)),
        "inf".value(Value::Float(f64::INFINITY)),
        "-inf".value(Value::Float(f64::NEG_INFINITY)),
        "nan".value(Value::Float(f64::NAN)),
        negative_number,
        float_literal.map(Value::Float),
        dec_int::<_, i64, _>.map(Value::Int),
    ))
    .context(StrContext::Expected(StrContextValue::Description("value")))
    .parse_next(input)
}

// -- Conditions -------------------------------------------------------------

fn attribute(input: &mut &str) -> ModalResult<(String, Value)> {
    ws.parse_next(input)?;
    let key = alt((string_literal, ident.map(str::to_owned))).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err(':')
        .context(StrContext::Expected(StrContextValue::CharLiteral(':')))
        .parse_next(input)?;
    let val = cut_err(value).parse_next(input)?;
    Ok((key, val))
}

fn condition(input: &mut &str) -> ModalResult<Condition> {
    '{'.parse_next(input)?;
    let attributes: Vec<(String, Value)> =
        repeat(0.., terminated(attribute, separator)).parse_next(input)?;
    ws.parse_next(input)?;
    cut_err('}')
        .context(StrContext::Expected(StrContextValue::Description(
            "attribute or `}`",
        )))
        .parse_next(input)?;
    Ok(attributes
        .into_iter()
        .fold(Condition::new(), |c, (key, val)| c.with(&key, val)))
}

// -- Groups -----------------------------------------------------------------

fn operator_keyword(input: &mut &str) -> ModalResult<Option<LogicOperator>> {
    ident
        .verify_map(|keyword| match keyword {
            "and" => Some(Some(LogicOperator::And)),
            "or" => Some(Some(LogicOperator::Or)),
            "group" => Some(None),
            _ => None,
        })
        .context(StrContext::Expected(StrContextValue::Description(
            "`and`, `or` or `group`",
        )))
        .parse_next(input)
}

fn entry(input: &mut &str) -> ModalResult<Entry> {
    ws.parse_next(input)?;
    alt((condition.map(Entry::Item), group.map(Entry::Group))).parse_next(input)
}

fn group(input: &mut &str) -> ModalResult<Group> {
    let operator = operator_keyword.parse_next(input)?;
    ws.parse_next(input)?;
    cut_err('[')
        .context(StrContext::Expected(StrContextValue::CharLiteral('[')))
        .parse_next(input)?;

    let entries: Vec<Entry> = repeat(0.., terminated(entry, separator)).parse_next(input)?;

    ws.parse_next(input)?;
    cut_err(']')
        .context(StrContext::Expected(StrContextValue::Description(
            "condition, group or `]`",
        )))
        .parse_next(input)?;

    let mut out = Group {
        operator,
        ..Group::default()
    };
    for entry in entries {
        match entry {
            Entry::Item(c) => out.items.push(c),
            Entry::Group(g) => out.groups.push(g),
        }
    }
    Ok(out)
}

// -- Top-level parser -------------------------------------------------------

pub fn parse_group(input: &mut &str) -> ModalResult<Group> {
    ws.parse_next(input)?;
    let parsed = group.parse_next(input)?;
    ws.parse_next(input)?;
    Ok(parsed)
}
