//! Helper macro generating port error enums with snake_case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum OvenPortError {
            Cold { message: String } => "oven cold: {message}",
            Full { slots: u32 } => "oven full: {slots} slots",
            Burnt { message: String, minutes: u32 } => "burnt {message} after {minutes}m",
            Closed => "oven closed",
        }
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        assert_eq!(OvenPortError::cold("warming").to_string(), "oven cold: warming");
    }

    #[test]
    fn constructors_preserve_non_string_types() {
        assert_eq!(OvenPortError::full(4_u32).to_string(), "oven full: 4 slots");
    }

    #[test]
    fn constructors_support_mixed_and_unit_variants() {
        assert_eq!(
            OvenPortError::burnt("calzone", 9_u32).to_string(),
            "burnt calzone after 9m"
        );
        assert_eq!(OvenPortError::closed(), OvenPortError::Closed);
    }
}
