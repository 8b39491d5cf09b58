//! The indentation-aware block parser.
//!
//! Turns raw lines into a generic [`Value`] tree with no knowledge of
//! target types (the `label` arguments below are used for error messages
//! only). The grammar is the restricted block subset:
//!
//! - a mapping line is `<indent><key>: <value>`; the key ends at the first
//!   colon and both sides are trimmed;
//! - a sequence item line is `<indent>- `, optionally followed inline by the
//!   item's first line; a second `-` at the same indentation closes the
//!   previous item;
//! - nesting is signaled purely by indentation depth; blank lines are
//!   structurally inert; no quoting, comments, anchors, tags, or flow
//!   collections are recognized.
//!
//! Lines indented deeper than the current block buffer under the most
//! recently seen key (or item) and are parsed recursively once the block
//! closes, replacing the placeholder scalar recorded for that key.

use smallvec::SmallVec;

use crate::error::Error;
use crate::line_input::{Line, LineInput, lines_of_str};
use crate::options::DuplicateKeyPolicy;
use crate::value::Value;
use std::io::Read;

/// Pending nested-block buffer. Most blocks are shallow; eight lines cover
/// the common case without a heap allocation.
type LineBuf = SmallVec<[Line; 8]>;

/// Where a flushed nested block should land.
#[derive(Clone, Copy)]
enum Attach {
    /// Replace the placeholder value of the pair at this index.
    Keep(usize),
    /// Parse for validity, then drop (duplicate key under `FirstWins`).
    Discard,
}

/// Parse a whole document from borrowed text.
///
/// A document with no significant lines parses as an empty mapping.
pub(crate) fn parse_str(
    text: &str,
    label: &'static str,
    policy: DuplicateKeyPolicy,
) -> Result<Value, Error> {
    let lines = lines_of_str(text);
    Ok(parse_lines(&lines, label, policy)?.unwrap_or_else(|| Value::Mapping(Vec::new())))
}

/// Parse a whole document from borrowed text, distinguishing blank input.
///
/// Returns `Ok(None)` when the document has no significant lines, which the
/// list entry point maps to an empty collection rather than an empty mapping.
pub(crate) fn parse_str_opt(
    text: &str,
    label: &'static str,
    policy: DuplicateKeyPolicy,
) -> Result<Option<Value>, Error> {
    let lines = lines_of_str(text);
    parse_lines(&lines, label, policy)
}

/// Recursively parse one block: a maximal run of lines at a single
/// indentation level plus everything nested more deeply beneath it.
pub(crate) fn parse_lines(
    lines: &[Line],
    label: &'static str,
    policy: DuplicateKeyPolicy,
) -> Result<Option<Value>, Error> {
    let Some(first) = lines.iter().find(|l| !l.is_blank()) else {
        return Ok(None);
    };
    if first.content().starts_with('-') {
        parse_sequence_block(lines, first.indent(), label, policy).map(Some)
    } else {
        parse_mapping_block(lines, first, label, policy).map(Some)
    }
}

/// Parse a block whose first significant line is a `-` item at `indent`.
fn parse_sequence_block(
    lines: &[Line],
    indent: usize,
    label: &'static str,
    policy: DuplicateKeyPolicy,
) -> Result<Value, Error> {
    let mut items = Vec::new();
    let mut cur = LineBuf::new();
    let mut started = false;

    for line in lines {
        if line.is_blank() {
            continue;
        }
        let ind = line.indent();
        if ind == indent && line.content().starts_with('-') {
            if started {
                items.push(finish_item(&cur, label, policy)?);
                cur.clear();
            }
            started = true;
            if let Some(inline) = inline_rest(line, indent) {
                cur.push(inline);
            }
        } else if ind > indent {
            // Deeper content, including more deeply indented dashes, belongs
            // to the current item.
            cur.push(line.clone());
        } else {
            return Err(Error::malformed(
                label,
                format!("expected a `-` item, found `{}`", line.content()),
            )
            .at(line.no));
        }
    }
    if started {
        items.push(finish_item(&cur, label, policy)?);
    }
    Ok(Value::Sequence(items))
}

/// Parse the buffered lines of one sequence item. An item with no body at
/// all (a bare dash) is an empty mapping.
fn finish_item(
    cur: &[Line],
    label: &'static str,
    policy: DuplicateKeyPolicy,
) -> Result<Value, Error> {
    Ok(parse_lines(cur, label, policy)?.unwrap_or_else(|| Value::Mapping(Vec::new())))
}

/// Re-issue the content following a `- ` marker as the item's first line,
/// at the column where it actually sits.
fn inline_rest(line: &Line, indent: usize) -> Option<Line> {
    let rest = &line.text[indent + 1..];
    if rest.trim().is_empty() {
        return None;
    }
    Some(Line {
        no: line.no,
        text: format!("{} {}", &line.text[..indent], rest),
    })
}

/// Parse a block whose first significant line is not a `-` item: either one
/// bare scalar, or `key: value` pairs with nested blocks buffered under the
/// most recent key.
fn parse_mapping_block(
    lines: &[Line],
    first: &Line,
    label: &'static str,
    policy: DuplicateKeyPolicy,
) -> Result<Value, Error> {
    if first.content().split_once(':').is_none() {
        // A block whose only significant line carries neither colon nor dash
        // is a bare scalar; that is what gives sequence items like `- 42`
        // and scalar list elements their value shape.
        let extra = lines
            .iter()
            .filter(|l| !l.is_blank())
            .nth(1);
        if let Some(line) = extra {
            return Err(Error::malformed(
                label,
                format!(
                    "line is neither a `key: value` pair nor a `- ` item: `{}`",
                    line.content()
                ),
            )
            .at(line.no));
        }
        return Ok(Value::Scalar(first.content().to_string()));
    }

    let mut pairs: Vec<(String, Value)> = Vec::new();
    let mut pending = LineBuf::new();
    let mut last: Option<Attach> = None;
    let mut indent = first.indent();

    for line in lines {
        if line.is_blank() {
            continue;
        }
        let ind = line.indent();
        if ind > indent {
            pending.push(line.clone());
            continue;
        }
        // Back at (or above) the block level: the nested block, if any, is
        // complete. Parse it and attach it to the key that owns it.
        flush_pending(&mut pairs, &mut pending, last, label, policy)?;
        indent = ind;

        let content = line.content();
        if content.starts_with('-') {
            return Err(Error::malformed(
                label,
                "unexpected `-` item inside a mapping block".to_string(),
            )
            .at(line.no));
        }
        let Some((raw_key, raw_val)) = content.split_once(':') else {
            return Err(Error::malformed(
                label,
                format!("line is neither a `key: value` pair nor a `- ` item: `{content}`"),
            )
            .at(line.no));
        };
        let key = raw_key.trim();
        if key.is_empty() {
            return Err(Error::malformed(label, "empty key".to_string()).at(line.no));
        }
        let val = Value::Scalar(raw_val.trim().to_string());

        match pairs.iter().position(|(k, _)| k == key) {
            None => {
                pairs.push((key.to_string(), val));
                last = Some(Attach::Keep(pairs.len() - 1));
            }
            Some(_) if policy == DuplicateKeyPolicy::Error => {
                return Err(
                    Error::malformed(label, format!("duplicate key `{key}`")).at(line.no)
                );
            }
            Some(_) if policy == DuplicateKeyPolicy::FirstWins => {
                last = Some(Attach::Discard);
            }
            Some(i) => {
                // LastWins: the later pair replaces the earlier one, taking
                // the later position.
                pairs.remove(i);
                pairs.push((key.to_string(), val));
                last = Some(Attach::Keep(pairs.len() - 1));
            }
        }
    }
    flush_pending(&mut pairs, &mut pending, last, label, policy)?;
    Ok(Value::Mapping(pairs))
}

/// Recursively parse the pending nested block and assign it to the key
/// remembered in `last`, overwriting the placeholder scalar recorded when
/// the key line was read.
fn flush_pending(
    pairs: &mut [(String, Value)],
    pending: &mut LineBuf,
    last: Option<Attach>,
    label: &'static str,
    policy: DuplicateKeyPolicy,
) -> Result<(), Error> {
    if pending.is_empty() {
        return Ok(());
    }
    let nested = parse_lines(pending, label, policy)?.unwrap_or_else(|| Value::Mapping(Vec::new()));
    match last {
        Some(Attach::Keep(idx)) => pairs[idx].1 = nested,
        Some(Attach::Discard) => {}
        None => {
            let line = pending.first().map(|l| l.no).unwrap_or(0);
            return Err(
                Error::malformed(label, "indented block with no preceding key".to_string())
                    .at(line),
            );
        }
    }
    pending.clear();
    Ok(())
}

/// Split a primitive-collection document on `-` delimiters, trimming each
/// token, bypassing the mapping grammar entirely.
pub(crate) fn split_scalar_items(text: &str) -> Vec<String> {
    text.split('-')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .collect()
}

/// Pull the lines of exactly one sequence item from an incremental input.
///
/// Reads only as far as the boundary: the `-` line that opens the *next*
/// item is read, recognized, and pushed back for the following demand. The
/// sequence indentation is discovered at the first item and kept in
/// `seq_indent` across calls.
///
/// Returns `Ok(None)` once no significant input remains.
pub(crate) fn next_item_lines<R: Read>(
    input: &mut LineInput<R>,
    seq_indent: &mut Option<usize>,
    label: &'static str,
) -> Result<Option<Vec<Line>>, Error> {
    // Find the opening dash of this item, skipping inert blanks.
    let opening = loop {
        match input.next_line()? {
            None => return Ok(None),
            Some(line) if line.is_blank() => continue,
            Some(line) => break line,
        }
    };
    let ind = opening.indent();
    let indent = *seq_indent.get_or_insert(ind);
    if ind != indent || !opening.content().starts_with('-') {
        return Err(Error::malformed(
            label,
            format!("expected a `-` item, found `{}`", opening.content()),
        )
        .at(opening.no));
    }

    let mut item = Vec::new();
    if let Some(inline) = inline_rest(&opening, indent) {
        item.push(inline);
    }
    loop {
        let Some(line) = input.next_line()? else {
            break;
        };
        if line.is_blank() {
            continue;
        }
        let ind = line.indent();
        if ind == indent && line.content().starts_with('-') {
            input.push_back(line);
            break;
        }
        if ind > indent {
            item.push(line);
            continue;
        }
        return Err(Error::malformed(
            label,
            format!("expected a `-` item, found `{}`", line.content()),
        )
        .at(line.no));
    }
    Ok(Some(item))
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    fn mapping(pairs: &[(&str, Value)]) -> Value {
        Value::Mapping(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.clone()))
                .collect(),
        )
    }

    fn scalar(s: &str) -> Value {
        Value::Scalar(s.to_string())
    }

    fn parse(text: &str) -> Value {
        parse_str(text, "Test", DuplicateKeyPolicy::Error).unwrap()
    }

    #[test]
    fn flat_mapping_trims_keys_and_values() {
        let v = parse("name: Maria Candida\nnr:  873435  \n");
        assert_eq!(
            v,
            mapping(&[("name", scalar("Maria Candida")), ("nr", scalar("873435"))])
        );
    }

    #[test]
    fn values_may_contain_colons() {
        let v = parse("when: 12:30\n");
        assert_eq!(v, mapping(&[("when", scalar("12:30"))]));
    }

    #[test]
    fn nested_block_replaces_placeholder() {
        let v = parse(indoc! {"
            name: Maria
            address:
              street: Rua Rosa
              nr: 78
            from: Oleiros
        "});
        assert_eq!(
            v,
            mapping(&[
                ("name", scalar("Maria")),
                (
                    "address",
                    mapping(&[("street", scalar("Rua Rosa")), ("nr", scalar("78"))])
                ),
                ("from", scalar("Oleiros")),
            ])
        );
    }

    #[test]
    fn blank_lines_are_inert() {
        let v = parse("a: 1\n\n   \nb: 2\n");
        assert_eq!(v, mapping(&[("a", scalar("1")), ("b", scalar("2"))]));
    }

    #[test]
    fn sequence_of_mappings_under_a_key() {
        let v = parse(indoc! {"
            addresses:
              -
                street: Rua Rosa
              -
                street: Rua Azul
        "});
        let Value::Mapping(pairs) = &v else {
            panic!("expected mapping")
        };
        assert_eq!(
            pairs[0].1,
            Value::Sequence(vec![
                mapping(&[("street", scalar("Rua Rosa"))]),
                mapping(&[("street", scalar("Rua Azul"))]),
            ])
        );
    }

    #[test]
    fn inline_item_content_after_dash() {
        let v = parse(indoc! {"
            - street: Rua Rosa
              nr: 78
            - street: Rua Azul
        "});
        assert_eq!(
            v,
            Value::Sequence(vec![
                mapping(&[("street", scalar("Rua Rosa")), ("nr", scalar("78"))]),
                mapping(&[("street", scalar("Rua Azul"))]),
            ])
        );
    }

    #[test]
    fn scalar_items_parse_as_scalars() {
        let v = parse("- 10\n- 20\n- 30\n");
        assert_eq!(
            v,
            Value::Sequence(vec![scalar("10"), scalar("20"), scalar("30")])
        );
    }

    #[test]
    fn deeper_dash_folds_into_current_item() {
        let v = parse(indoc! {"
            - name: a
              tags:
                - red
                - blue
            - name: b
        "});
        let Value::Sequence(items) = &v else {
            panic!("expected sequence")
        };
        assert_eq!(items.len(), 2);
        assert_eq!(
            items[0].get("tags"),
            Some(&Value::Sequence(vec![scalar("red"), scalar("blue")]))
        );
    }

    #[test]
    fn mixed_nested_mapping_and_list_in_one_item() {
        let v = parse(indoc! {"
            - name:
                first: Maria
              tags:
                - red
        "});
        let Value::Sequence(items) = &v else {
            panic!("expected sequence")
        };
        assert_eq!(
            items[0].get("name"),
            Some(&mapping(&[("first", scalar("Maria"))]))
        );
        assert_eq!(
            items[0].get("tags"),
            Some(&Value::Sequence(vec![scalar("red")]))
        );
    }

    #[test]
    fn malformed_line_names_the_target() {
        let err = parse_str("name Maria\n", "Student", DuplicateKeyPolicy::Error);
        // A single colon-less line is a bare scalar; two of them are not.
        assert!(err.is_ok());
        let err = parse_str(
            "name: Maria\ngarbage line\n",
            "Student",
            DuplicateKeyPolicy::Error,
        )
        .unwrap_err();
        let msg = format!("{err}");
        assert!(msg.contains("Student"), "got: {msg}");
        assert!(msg.contains("line 2"), "got: {msg}");
    }

    #[test]
    fn duplicate_keys_follow_policy() {
        let text = "a: 1\na: 2\n";
        assert!(parse_str(text, "T", DuplicateKeyPolicy::Error).is_err());
        assert_eq!(
            parse_str(text, "T", DuplicateKeyPolicy::FirstWins).unwrap(),
            mapping(&[("a", scalar("1"))])
        );
        assert_eq!(
            parse_str(text, "T", DuplicateKeyPolicy::LastWins).unwrap(),
            mapping(&[("a", scalar("2"))])
        );
    }

    #[test]
    fn empty_document_is_empty_mapping() {
        assert_eq!(parse(""), mapping(&[]));
        assert_eq!(parse("\n  \n"), mapping(&[]));
    }

    #[test]
    fn split_scalar_items_trims_and_drops_blanks() {
        assert_eq!(
            split_scalar_items("- 10\n- 20\n-\n- 30"),
            vec!["10", "20", "30"]
        );
    }

    #[test]
    fn boundary_scanner_stops_at_the_next_dash() {
        let text = "- \n    item: item1\n-\n    item: item2\n";
        let mut input = LineInput::new(text.as_bytes());
        let mut indent = None;
        let first = next_item_lines(&mut input, &mut indent, "T")
            .unwrap()
            .unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].content(), "item: item1");
        // The boundary dash was pushed back, not consumed.
        let second = next_item_lines(&mut input, &mut indent, "T")
            .unwrap()
            .unwrap();
        assert_eq!(second[0].content(), "item: item2");
        assert!(
            next_item_lines(&mut input, &mut indent, "T")
                .unwrap()
                .is_none()
        );
    }
}
