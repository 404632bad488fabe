/// Generates builder-style setters for request structs.
///
/// `setter!(field: Ty)` sets a field, `setter!(inner.field: Ty)` sets a field of
/// a nested body, and the `opt` forms wrap the value in `Some`.
macro_rules! setter {
    ($field:ident : $ty:ty) => {
        pub fn $field<T>(mut self, $field: T) -> Self
        where
            T: Into<$ty>,
        {
            self.$field = $field.into();
            self
        }
    };

    ($field:ident . $subfield:ident : $ty:ty) => {
        pub fn $subfield<T>(mut self, $subfield: T) -> Self
        where
            T: Into<$ty>,
        {
            self.$field.$subfield = $subfield.into();
            self
        }
    };

    (opt $field:ident . $subfield:ident : $ty:ty) => {
        pub fn $subfield<T>(mut self, $subfield: T) -> Self
        where
            T: Into<$ty>,
        {
            self.$field.$subfield = std::option::Option::Some($subfield.into());
            self
        }
    };
}

pub(crate) use setter;
