//! `define_port_error!`: declares a `thiserror` enum for a driven port plus
//! one snake_case constructor per variant.
//!
//! Constructor parameters take `impl Into<T>` so adapters can pass `&str`
//! for `String` fields:
//!
//! ```ignore
//! define_port_error! {
//!     pub enum StoreError {
//!         Connection { message: String } => "connection failed: {message}",
//!         Gone => "record is gone",
//!     }
//! }
//! let err = StoreError::connection("refused");
//! let gone = StoreError::gone();
//! ```

macro_rules! define_port_error {
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
                define_port_error!(@constructor $variant $( $($field : $ty),* )?);
            )*
        }
    };

    (@constructor $variant:ident) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@constructor $variant:ident $($field:ident : $ty:ty),+) => {
        ::paste::paste! {
            #[doc = concat!("Build [`Self::", stringify!($variant), "`].")]
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),+) -> Self {
                Self::$variant { $($field: $field.into()),+ }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    use rstest::rstest;

    define_port_error! {
        pub enum LedgerError {
            Unreachable { message: String } => "ledger unreachable: {message}",
            Locked => "ledger is locked",
            Rejected { status: u16, reason: String } => "ledger rejected ({status}): {reason}",
        }
    }

    #[rstest]
    fn string_fields_accept_str() {
        assert_eq!(
            LedgerError::unreachable("timeout").to_string(),
            "ledger unreachable: timeout"
        );
    }

    #[rstest]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(LedgerError::locked(), LedgerError::Locked);
    }

    #[rstest]
    fn multi_field_variants_keep_field_types() {
        let err = LedgerError::rejected(410_u16, "gone");
        assert_eq!(
            err,
            LedgerError::Rejected {
                status: 410,
                reason: "gone".to_owned(),
            }
        );
        assert_eq!(err.to_string(), "ledger rejected (410): gone");
    }
}
