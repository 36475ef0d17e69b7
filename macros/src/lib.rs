//! Derive macros for the Tidy state container
//!
//! This crate provides procedural macros to reduce boilerplate when building
//! reducer-driven state machines with Tidy.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates wire type names for action enums
//! - `#[derive(State)]` - Generates revision tracking helpers for state structs
//!
//! # Example
//!
//! ```ignore
//! use tidy_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     AddTodo { task: String },
//!     #[action(rename = "RESET")]
//!     ClearCompleted,
//! }
//!
//! assert_eq!(TodoAction::AddTodo { task: "x".into() }.action_type(), "ADD_TODO");
//! assert_eq!(TodoAction::ClearCompleted.action_type(), "RESET");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, LitStr};

/// Derive macro for Action enums
///
/// Generates:
/// - `action_type()` - The wire type name of the variant
/// - `ACTION_TYPES` - Every wire type name, in declaration order
/// - An implementation of `tidy_core::action::Action` (the deriving crate
///   must depend on `tidy-core`)
///
/// Wire type names default to the variant name in `SCREAMING_SNAKE_CASE`
/// (`UpdateTodoStatus` becomes `UPDATE_TODO_STATUS`).
///
/// # Attributes
///
/// - `#[action(rename = "NAME")]` - Override the wire type name of a variant
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-enum type
/// - An `#[action(..)]` attribute is malformed
#[proc_macro_derive(Action, attributes(action))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut type_names = Vec::new();
    let mut arms = Vec::new();

    for variant in &data_enum.variants {
        let variant_name = &variant.ident;

        let type_name = match renamed(&variant.attrs) {
            Ok(Some(rename)) => rename,
            Ok(None) => screaming_snake_case(&variant_name.to_string()),
            Err(error) => return error.to_compile_error().into(),
        };

        let pattern = match &variant.fields {
            Fields::Named(_) => quote! { Self::#variant_name { .. } },
            Fields::Unnamed(_) => quote! { Self::#variant_name(..) },
            Fields::Unit => quote! { Self::#variant_name },
        };

        arms.push(quote! { #pattern => #type_name, });
        type_names.push(type_name);
    }

    let expanded = quote! {
        impl #name {
            /// Every wire type name of this action, in declaration order
            pub const ACTION_TYPES: &'static [&'static str] = &[#(#type_names),*];

            /// Returns the wire type name of this action
            #[must_use]
            pub const fn action_type(&self) -> &'static str {
                match self {
                    #(#arms)*
                }
            }
        }

        impl ::tidy_core::action::Action for #name {
            fn action_type(&self) -> &'static str {
                #name::action_type(self)
            }
        }
    };

    TokenStream::from(expanded)
}

/// Derive macro for State structs
///
/// Handles a revision counter field marked with `#[revision]`, generating:
/// - `revision()` - The current revision
/// - `bump_revision()` - Advance the revision after a change
///
/// Selectors use the revision as a cheap memoization key.
///
/// # Attributes
///
/// - `#[revision]` - Mark a `u64` field as the revision counter
///
/// # Panics
///
/// This macro will produce a compile error (not a runtime panic) if:
/// - Applied to a non-struct type
/// - More than one field is marked `#[revision]`
///
/// # Example
///
/// ```ignore
/// use tidy_macros::State;
///
/// #[derive(State, Clone, Debug, Default)]
/// struct TodoState {
///     pub todos: Vec<Todo>,
///     #[revision]
///     pub revision: u64,
/// }
/// ```
#[proc_macro_derive(State, attributes(revision))]
pub fn derive_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Struct(data_struct) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(State)] can only be used on structs")
            .to_compile_error()
            .into();
    };

    let mut revision_fields = data_struct
        .fields
        .iter()
        .filter(|field| has_attribute(&field.attrs, "revision"));

    let Some(field) = revision_fields.next() else {
        return TokenStream::new();
    };

    if let Some(extra) = revision_fields.next() {
        return syn::Error::new_spanned(extra, "only one field can be marked #[revision]")
            .to_compile_error()
            .into();
    }

    let Some(field_name) = field.ident.as_ref() else {
        return syn::Error::new_spanned(field, "#[revision] requires a named field")
            .to_compile_error()
            .into();
    };

    let expanded = quote! {
        impl #name {
            /// Get the current revision of this state
            #[must_use]
            pub const fn revision(&self) -> u64 {
                self.#field_name
            }

            /// Advance the revision after a change
            pub fn bump_revision(&mut self) {
                self.#field_name = self.#field_name.wrapping_add(1);
            }
        }
    };

    TokenStream::from(expanded)
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}

/// Reads `#[action(rename = "...")]` from a variant's attributes
fn renamed(attrs: &[Attribute]) -> syn::Result<Option<String>> {
    let mut rename = None;

    for attr in attrs.iter().filter(|attr| attr.path().is_ident("action")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("rename") {
                let value: LitStr = meta.value()?.parse()?;
                rename = Some(value.value());
                Ok(())
            } else {
                Err(meta.error("unsupported action attribute, expected `rename`"))
            }
        })?;
    }

    Ok(rename)
}

/// `UpdateTodoStatus` -> `UPDATE_TODO_STATUS`
fn screaming_snake_case(ident: &str) -> String {
    let mut out = String::with_capacity(ident.len() + 4);

    for (i, ch) in ident.char_indices() {
        if ch.is_uppercase() && i > 0 {
            out.push('_');
        }
        out.extend(ch.to_uppercase());
    }

    out
}
