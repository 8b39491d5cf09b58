//! Lazy iteration over a sequence document.
//!
//! One demand pulls exactly one item: the boundary scanner reads lines up
//! to (and including) the `-` line opening the next item, which is pushed
//! back into the input; the item's lines are then parsed and materialized
//! before yielding. Converter side effects therefore track consumption
//! exactly — nothing is materialized ahead of demand.

use std::io::Read;
use std::marker::PhantomData;

use crate::api::bind_root;
use crate::blocks::{next_item_lines, parse_lines};
use crate::descriptor::FromYaml;
use crate::error::Error;
use crate::line_input::LineInput;
use crate::options::Options;
use crate::value::Value;

/// Forward-only, single-pass iterator over the items of a sequence
/// document. Created by [`crate::sequence`].
///
/// After an error is yielded the iterator is exhausted; the underlying
/// input is in an undefined position and no resumption is attempted. The
/// input handle is released as soon as the iterator is exhausted (or
/// errored), not only when it is dropped.
pub struct SequenceIter<T: FromYaml, R: Read> {
    input: Option<LineInput<R>>,
    options: Options,
    /// Indentation of the top-level items, discovered at the first one.
    indent: Option<usize>,
    _target: PhantomData<fn() -> T>,
}

impl<T: FromYaml, R: Read> SequenceIter<T, R> {
    pub(crate) fn new(reader: R, options: Options) -> Self {
        Self {
            input: Some(LineInput::new(reader)),
            options,
            indent: None,
            _target: PhantomData,
        }
    }
}

impl<T: FromYaml, R: Read> Iterator for SequenceIter<T, R> {
    type Item = Result<T, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        let input = self.input.as_mut()?;
        let lines = match next_item_lines(input, &mut self.indent, T::type_name()) {
            Err(e) => {
                self.input = None;
                return Some(Err(e));
            }
            Ok(None) => {
                self.input = None;
                return None;
            }
            Ok(Some(lines)) => lines,
        };
        let bound = parse_lines(&lines, T::type_name(), self.options.duplicate_keys)
            .map(|value| value.unwrap_or_else(|| Value::Mapping(Vec::new())))
            .and_then(|value| bind_root::<T>(&value, &self.options));
        if bound.is_err() {
            self.input = None;
        }
        Some(bound)
    }
}
