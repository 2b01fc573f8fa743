//! Derive macro for rowcraft entities.
//!
//! This crate provides `#[derive(Entity)]`, which maps a struct with named
//! fields to table metadata and per-column field access.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::meta::ParseNestedMeta;
use syn::{
    parse_macro_input, Attribute, Data, DeriveInput, Fields, GenericArgument, Ident, LitStr,
    PathArguments, Token, Type,
};

/// Derives `rowcraft_core::schema::Entity` for a struct.
///
/// # Attributes
///
/// - `#[table(name = "table_name")]` - Specifies the SQL table name (optional,
///   defaults to `snake_case` of struct name)
///
/// # Field Attributes
///
/// - `#[column(name = "column_name")]` - SQL column name (defaults to the
///   field name)
/// - `#[column(primary_key)]` - Marks the field as primary key
/// - `#[column(autoincrement)]` - Marks the column as auto-incrementing
/// - `#[column(nullable)]` - Marks the column as nullable (`Option<T>` fields
///   always are)
/// - `#[column(default = "expr")]` - Sets a raw SQL default expression
/// - `#[column(sql_type = "TYPE")]` - Overrides the inferred SQL type
/// - `#[column(index)]` / `#[column(index = "name")]` - Adds the column to a
///   plain index; fields sharing a name form a composite index
/// - `#[column(unique)]` / `#[column(unique = "name")]` - Same, for unique
///   constraints
/// - `#[column(reference)]` - The field is another entity; conditions bind
///   its primary key and the column takes the type of that key (`BIGINT`
///   when the referenced table declares none)
/// - `#[column(write_only)]` / `#[column(read_only)]` - Mapping direction
/// - `#[column(skip)]` - The field is not mapped
#[proc_macro_derive(Entity, attributes(table, column))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive_entity_impl(input)
        .unwrap_or_else(|e| e.to_compile_error())
        .into()
}

fn derive_entity_impl(input: DeriveInput) -> syn::Result<TokenStream2> {
    let struct_name = &input.ident;
    let table_name = get_table_name(&input.attrs, struct_name)?;

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity derive only supports structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity derive only supports structs",
            ));
        }
    };

    let mut columns: Vec<ColumnInfo> = Vec::new();
    for field in fields {
        let attrs = parse_column_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        let field_name = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new_spanned(field, "expected a named field"))?;
        let column_name = attrs.name.clone().unwrap_or_else(|| field_name.to_string());

        columns.push(ColumnInfo {
            field_name,
            optional: option_inner(&field.ty).is_some(),
            sql_type: match (&attrs.sql_type, attrs.reference) {
                (Some(custom), _) => SqlTypeHint::Custom(custom.clone()),
                (None, true) => SqlTypeHint::KeyOf(field.ty.clone()),
                (None, false) => infer_sql_type(&field.ty),
            },
            column_name,
            attrs,
        });
    }

    let column_exprs = columns.iter().map(column_meta_tokens);

    let index_calls = columns.iter().flat_map(|c| {
        c.attrs.indexes.iter().map(move |index| {
            let index = index.as_deref().unwrap_or(&c.column_name);
            let column = &c.column_name;
            quote! { .index(#index, #column) }
        })
    });

    let unique_calls = columns.iter().flat_map(|c| {
        c.attrs.uniques.iter().map(move |unique| {
            let unique = unique.as_deref().unwrap_or(&c.column_name);
            let column = &c.column_name;
            quote! { .unique(#unique, #column) }
        })
    });

    let value_arms = columns.iter().map(|c| {
        let column = &c.column_name;
        let field = &c.field_name;
        if c.attrs.reference {
            quote! {
                #column => ::core::option::Option::Some(
                    ::rowcraft_core::schema::FieldValue::Reference(&self.#field)
                ),
            }
        } else {
            quote! {
                #column => ::core::option::Option::Some(
                    ::rowcraft_core::schema::ToField::to_field(&self.#field)
                ),
            }
        }
    });

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics ::rowcraft_core::schema::Entity for #struct_name #ty_generics #where_clause {
            fn table() -> ::rowcraft_core::schema::TableMeta {
                ::rowcraft_core::schema::TableMeta::new(#table_name)
                    #(.column(#column_exprs))*
                    #(#index_calls)*
                    #(#unique_calls)*
            }

            fn describe(&self) -> ::rowcraft_core::schema::TableMeta {
                <Self as ::rowcraft_core::schema::Entity>::table()
            }

            fn field_value(
                &self,
                column: &str,
            ) -> ::core::option::Option<::rowcraft_core::schema::FieldValue<'_>> {
                match column {
                    #(#value_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    };

    Ok(expanded)
}

struct ColumnInfo {
    field_name: Ident,
    column_name: String,
    optional: bool,
    sql_type: SqlTypeHint,
    attrs: ColumnAttrs,
}

#[derive(Default)]
struct ColumnAttrs {
    name: Option<String>,
    primary_key: bool,
    autoincrement: bool,
    nullable: bool,
    default_expr: Option<String>,
    sql_type: Option<String>,
    indexes: Vec<Option<String>>,
    uniques: Vec<Option<String>>,
    reference: bool,
    write_only: bool,
    read_only: bool,
    skip: bool,
}

enum SqlTypeHint {
    Smallint,
    Integer,
    Bigint,
    Real,
    Double,
    Varchar(u32),
    Text,
    Blob,
    Date,
    Datetime,
    Boolean,
    Custom(String),
    /// Primary key type of a referenced entity, resolved when the table
    /// metadata is built.
    KeyOf(Type),
}

fn column_meta_tokens(c: &ColumnInfo) -> TokenStream2 {
    let name = &c.column_name;
    let ty = sql_type_tokens(&c.sql_type);

    let mut tokens = quote! {
        ::rowcraft_core::schema::ColumnMeta::new(#name, #ty)
    };
    if c.attrs.primary_key {
        tokens.extend(quote! { .primary_key() });
    } else if !c.attrs.nullable && !c.optional {
        tokens.extend(quote! { .not_null() });
    }
    if c.attrs.autoincrement {
        tokens.extend(quote! { .autoincrement() });
    }
    if c.attrs.write_only {
        tokens.extend(quote! { .map_type(::rowcraft_core::schema::MapType::ToDbOnly) });
    } else if c.attrs.read_only {
        tokens.extend(quote! { .map_type(::rowcraft_core::schema::MapType::FromDbOnly) });
    }
    if let Some(ref expr) = c.attrs.default_expr {
        tokens.extend(quote! { .default_expr(#expr) });
    }
    tokens
}

fn sql_type_tokens(hint: &SqlTypeHint) -> TokenStream2 {
    let path = quote! { ::rowcraft_core::schema::SqlType };
    match hint {
        SqlTypeHint::Smallint => quote! { #path::Smallint },
        SqlTypeHint::Integer => quote! { #path::Integer },
        SqlTypeHint::Bigint => quote! { #path::Bigint },
        SqlTypeHint::Real => quote! { #path::Real },
        SqlTypeHint::Double => quote! { #path::Double },
        SqlTypeHint::Varchar(n) => quote! { #path::Varchar(::core::option::Option::Some(#n)) },
        SqlTypeHint::Text => quote! { #path::Text },
        SqlTypeHint::Blob => quote! { #path::Blob },
        SqlTypeHint::Date => quote! { #path::Date },
        SqlTypeHint::Datetime => quote! { #path::Datetime },
        SqlTypeHint::Boolean => quote! { #path::Boolean },
        SqlTypeHint::Custom(name) => {
            quote! { #path::Custom(::std::string::String::from(#name)) }
        }
        SqlTypeHint::KeyOf(ty) => quote! {
            <#ty as ::rowcraft_core::schema::Entity>::table()
                .primary_key()
                .map_or(#path::Bigint, |pk| pk.sql_type.clone())
        },
    }
}

/// Maps a Rust field type to a SQL type by its last path segment.
fn infer_sql_type(ty: &Type) -> SqlTypeHint {
    let ty = option_inner(ty).unwrap_or(ty);
    let rust_type = quote!(#ty).to_string().replace(' ', "");
    let last = rust_type.rsplit("::").next().unwrap_or(&rust_type);
    match last {
        "i8" | "i16" | "u8" => SqlTypeHint::Smallint,
        "i32" | "u16" | "u32" => SqlTypeHint::Integer,
        "i64" | "u64" | "isize" | "usize" => SqlTypeHint::Bigint,
        "f32" => SqlTypeHint::Real,
        "f64" => SqlTypeHint::Double,
        "bool" => SqlTypeHint::Boolean,
        "String" | "&str" => SqlTypeHint::Varchar(255),
        "Vec<u8>" => SqlTypeHint::Blob,
        "NaiveDate" => SqlTypeHint::Date,
        s if s.starts_with("DateTime") || s == "NaiveDateTime" => SqlTypeHint::Datetime,
        _ => SqlTypeHint::Text,
    }
}

fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

fn get_table_name(attrs: &[Attribute], struct_name: &Ident) -> syn::Result<String> {
    for attr in attrs {
        if attr.path().is_ident("table") {
            let mut table_name = None;
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    let value: LitStr = meta.value()?.parse()?;
                    table_name = Some(value.value());
                    Ok(())
                } else {
                    Err(meta.error("unsupported table attribute"))
                }
            })?;
            if let Some(name) = table_name {
                return Ok(name);
            }
        }
    }
    // Default to snake_case of struct name
    Ok(to_snake_case(&struct_name.to_string()))
}

fn parse_column_attrs(attrs: &[Attribute]) -> syn::Result<ColumnAttrs> {
    let mut result = ColumnAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("column") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("primary_key") {
                result.primary_key = true;
            } else if meta.path.is_ident("autoincrement") {
                result.autoincrement = true;
            } else if meta.path.is_ident("nullable") {
                result.nullable = true;
            } else if meta.path.is_ident("reference") {
                result.reference = true;
            } else if meta.path.is_ident("write_only") {
                result.write_only = true;
            } else if meta.path.is_ident("read_only") {
                result.read_only = true;
            } else if meta.path.is_ident("skip") {
                result.skip = true;
            } else if meta.path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                result.name = Some(value.value());
            } else if meta.path.is_ident("default") {
                let value: LitStr = meta.value()?.parse()?;
                result.default_expr = Some(value.value());
            } else if meta.path.is_ident("sql_type") {
                let value: LitStr = meta.value()?.parse()?;
                result.sql_type = Some(value.value());
            } else if meta.path.is_ident("index") {
                result.indexes.push(optional_name(&meta)?);
            } else if meta.path.is_ident("unique") {
                result.uniques.push(optional_name(&meta)?);
            } else {
                return Err(meta.error("unsupported column attribute"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

/// Parses `index` or `index = "name"`.
fn optional_name(meta: &ParseNestedMeta<'_>) -> syn::Result<Option<String>> {
    if meta.input.peek(Token![=]) {
        let value: LitStr = meta.value()?.parse()?;
        Ok(Some(value.value()))
    } else {
        Ok(None)
    }
}

fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    for (i, c) in s.chars().enumerate() {
        if c.is_uppercase() {
            if i > 0 {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
        } else {
            result.push(c);
        }
    }
    result
}
