//! Human-readable rendering of tag trees, mostly for tests and debug
//! output. Scalars carry a kind suffix, strings are quoted, containers
//! indent by one tab per depth.

use crate::nbt::Map;
use crate::nbt::tag::{
	ListTag,
	NamedTag,
	Tag,
};

/// Renders a named root tag as indented text.
pub fn to_pretty_string(tag: &NamedTag) -> String {
	if tag.name.is_empty() {
		tag.tag.to_pretty_string()
	} else {
		format!("{}: {}", quote(&tag.name), tag.tag.to_pretty_string())
	}
}

impl Tag {
	/// Renders this tag as indented text.
	pub fn to_pretty_string(&self) -> String {
		let mut out = String::new();
		fmt_tag(&mut out, self, 0);
		out
	}
}

fn quote(text: &str) -> String {
	let escaped = text.replace('\\', "\\\\").replace('"', "\\\"");
	format!("\"{escaped}\"")
}

fn push_tabs(out: &mut String, level: usize) {
	for _ in 0..level {
		out.push('\t');
	}
}

/// Writes each element on its own line at `level + 1`, with the closing
/// bracket back at `level`. The cursor is assumed to sit right after
/// the spot where the opening bracket belongs.
fn fmt_lines<T, F: Fn(&mut String, &T, usize)>(
	out: &mut String,
	elements: &[T],
	level: usize,
	brackets: (char, char),
	fmt: F,
) {
	if elements.is_empty() {
		out.push(brackets.0);
		out.push(brackets.1);
		return;
	}
	out.push(brackets.0);
	out.push('\n');
	for element in elements {
		push_tabs(out, level + 1);
		fmt(out, element, level + 1);
		out.push_str(",\n");
	}
	push_tabs(out, level);
	out.push(brackets.1);
}

fn fmt_scalar<T: std::fmt::Display>(out: &mut String, value: T, suffix: char) {
	out.push_str(&value.to_string());
	out.push(suffix);
}

fn fmt_map(out: &mut String, map: &Map, level: usize) {
	let entries = map.iter().collect::<Vec<_>>();
	fmt_lines(out, &entries, level, ('{', '}'), |out, (name, tag), level| {
		out.push_str(&quote(name));
		out.push_str(": ");
		fmt_tag(out, tag, level);
	});
}

fn fmt_list(out: &mut String, list: &ListTag, level: usize) {
	match list {
		ListTag::Empty => out.push_str("[]"),
		ListTag::Byte(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'b')),
		ListTag::Short(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 's')),
		ListTag::Int(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'i')),
		ListTag::Long(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'l')),
		ListTag::Float(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'f')),
		ListTag::Double(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'd')),
		ListTag::ByteArray(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, level| {
			fmt_lines(out, v, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'b'))
		}),
		ListTag::String(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, _| out.push_str(&quote(v))),
		ListTag::List(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, level| fmt_list(out, v, level)),
		ListTag::Compound(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, level| fmt_map(out, v, level)),
		ListTag::IntArray(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, level| {
			fmt_lines(out, v, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'i'))
		}),
		ListTag::LongArray(list) => fmt_lines(out, list, level, ('[', ']'), |out, v, level| {
			fmt_lines(out, v, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'l'))
		}),
	}
}

fn fmt_tag(out: &mut String, tag: &Tag, level: usize) {
	match tag {
		Tag::Byte(value) => fmt_scalar(out, value, 'b'),
		Tag::Short(value) => fmt_scalar(out, value, 's'),
		Tag::Int(value) => fmt_scalar(out, value, 'i'),
		Tag::Long(value) => fmt_scalar(out, value, 'l'),
		Tag::Float(value) => fmt_scalar(out, value, 'f'),
		Tag::Double(value) => fmt_scalar(out, value, 'd'),
		Tag::ByteArray(value) => fmt_lines(out, value, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'b')),
		Tag::String(value) => out.push_str(&quote(value)),
		Tag::List(value) => fmt_list(out, value, level),
		Tag::Compound(value) => fmt_map(out, value, level),
		Tag::IntArray(value) => fmt_lines(out, value, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'i')),
		Tag::LongArray(value) => fmt_lines(out, value, level, ('[', ']'), |out, v, _| fmt_scalar(out, v, 'l')),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::{compound, list};

	#[test]
	fn scalar_suffixes() {
		assert_eq!(Tag::Byte(-3).to_pretty_string(), "-3b");
		assert_eq!(Tag::Short(12).to_pretty_string(), "12s");
		assert_eq!(Tag::Int(7).to_pretty_string(), "7i");
		assert_eq!(Tag::Long(-9).to_pretty_string(), "-9l");
		assert_eq!(Tag::Float(1.5).to_pretty_string(), "1.5f");
		assert_eq!(Tag::Double(0.25).to_pretty_string(), "0.25d");
		assert_eq!(Tag::String("hi \"there\"".to_owned()).to_pretty_string(), "\"hi \\\"there\\\"\"");
	}

	#[test]
	fn nested_containers_indent_with_tabs() {
		let tag = compound!(
			("name", "stone"),
			("ids", list![1i8, 2i8]),
		);
		assert_eq!(
			tag.to_pretty_string(),
			"{\n\t\"name\": \"stone\",\n\t\"ids\": [\n\t\t1b,\n\t\t2b,\n\t],\n}"
		);
	}

	#[test]
	fn named_root() {
		let tag = NamedTag::with_name("x", Tag::Int(1));
		assert_eq!(to_pretty_string(&tag), "\"x\": 1i");
		assert_eq!(to_pretty_string(&NamedTag::new(Tag::Byte(0))), "0b");
	}
}
