/// Builds a [Tag::Compound](crate::nbt::tag::Tag) from `(name, value)`
/// pairs. Names take anything `Into<String>`, values anything
/// `Into<Tag>`, so scalars, strings, arrays, and nested `compound!`/
/// [`list!`] calls all work directly:
/// ```no_run
/// use mcnbt::{compound, list};
///
/// let chest = compound!(
///     ("id", "minecraft:chest"),
///     ("CustomName", "Loot"),
///     ("Items", list![]),
/// );
/// ```
#[macro_export]
macro_rules! compound {
    () => {
        $crate::nbt::tag::Tag::Compound($crate::nbt::Map::new())
    };
    ($(($name:expr, $value:expr)),+$(,)?) => {{
        let mut map = $crate::nbt::Map::new();
        $(
            map.insert($name.into(), $crate::nbt::tag::Tag::from($value));
        )+
        $crate::nbt::tag::Tag::Compound(map)
    }};
}

/// Builds a [Tag::List](crate::nbt::tag::Tag) from its elements. The
/// element kind is picked up from the element type, so every element
/// must be of the same type:
/// ```no_run
/// use mcnbt::list;
///
/// let motion = list![0.5f64, -1.0f64, 0.0f64];
/// let facing = list!["east", "west"];
/// let empty = list![];
/// ```
#[macro_export]
macro_rules! list {
    () => {
        $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::Empty)
    };
    ($value:expr; $count:expr) => {
        $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::from(::std::vec![$value; $count]))
    };
    ($($value:expr),+$(,)?) => {
        $crate::nbt::tag::Tag::List($crate::nbt::tag::ListTag::from(::std::vec![$($value),+]))
    };
}

pub use list;
pub use compound;

#[cfg(test)]
mod tests {
    use crate::nbt::tag::{ListTag, Tag};

    #[test]
    fn compound_macro() {
        let tag = compound! {
            ("id", "minecraft:furnace"),
            ("BurnTime", 1600i16),
        };
        let Tag::Compound(map) = tag else {
            panic!("expected a compound");
        };
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("BurnTime"), Some(&Tag::Short(1600)));
        assert_eq!(compound!(), Tag::Compound(crate::nbt::Map::new()));
    }

    #[test]
    fn list_macro() {
        assert_eq!(list![1i16, 2i16], Tag::List(ListTag::Short(vec![1, 2])));
        assert_eq!(list!["up", "down"], Tag::List(ListTag::String(vec!["up".to_owned(), "down".to_owned()])));
        assert_eq!(list![7i64; 3], Tag::List(ListTag::Long(vec![7, 7, 7])));
        assert_eq!(list![], Tag::List(ListTag::Empty));
    }
}
