use std::fmt::Write;

use crate::ast;

pub(crate) fn emit(item: &ast::Item) -> String {
    let mut buf = String::new();
    match item {
        ast::Item::Args(args) => emit_args(&mut buf, args),
        ast::Item::Value(value) => emit_value(&mut buf, value),
        ast::Item::Group(group) => emit_group(&mut buf, group),
    }
    buf
}

pub(crate) fn emit_error(msg: &str) -> String {
    format!("::core::compile_error!({:?});", msg)
}

macro_rules! w {
    ($($tt:tt)*) => {
        drop(write!($($tt)*))
    };
}

fn emit_args(buf: &mut String, args: &ast::Args) {
    w!(buf, "impl declflags::Args for {} {{\n", args.name);
    w!(buf, "    fn schema() -> ::std::result::Result<declflags::Schema<Self>, declflags::SchemaError> {{\n");
    w!(buf, "        declflags::Schema::<Self>::builder()\n");
    for field in &args.fields {
        let access = format!("|it| &mut it.{}", field.name);
        for param in &field.params {
            if param.kind == ast::Kind::BinaryPath {
                w!(buf, "            .binary_path({:?}, {})\n", field.ident(), access);
                continue;
            }
            let method = match param.kind {
                ast::Kind::Switch => "switch",
                _ if !param.properties.is_empty() && field.list => "group_list",
                _ if !param.properties.is_empty() => "group",
                _ if field.list => "list",
                _ => "argument",
            };
            w!(buf, "            .{}(", method);
            emit_descriptor(buf, field, param);
            w!(buf, ", {})\n", access);
        }
    }
    w!(buf, "            .build()\n");
    w!(buf, "    }}\n");
    w!(buf, "}}\n");
}

fn emit_descriptor(buf: &mut String, field: &ast::Field, param: &ast::Param) {
    let ctor = match param.kind {
        ast::Kind::Switch => "declflags::Switch::new",
        ast::Kind::Completer => "declflags::Argument::completer",
        ast::Kind::RegisterCompleter => "declflags::Argument::register_completer",
        ast::Kind::Argument | ast::Kind::BinaryPath => "declflags::Argument::new",
    };
    w!(buf, "{}({:?})", ctor, field.ident());

    if let Some(switch) = &param.switch {
        w!(buf, ".name({:?})", switch);
    }
    if let Some(description) = param.description.as_ref().or(field.doc.as_ref()) {
        w!(buf, ".description({:?})", description);
    }
    let flags = [
        (param.case_sensitive, "case_sensitive"),
        (param.required, "required"),
        (param.floating, "floating"),
        (param.remainder, "remainder"),
        (param.complete_files, "complete_files"),
        (param.complete_directories, "complete_directories"),
    ];
    for (_, flag) in flags.iter().filter(|(on, _)| *on) {
        w!(buf, ".{}()", flag);
    }
    if let Some(short_name) = &param.short_name {
        w!(buf, ".short_name({:?})", short_name);
    }
    if !param.properties.is_empty() {
        w!(buf, ".properties({})", string_array(&param.properties));
    }
    if let Some(delimiters) = &param.delimiters {
        w!(buf, ".delimiters({:?})", delimiters);
    }
    if let Some(candidates) = &param.complete_with {
        w!(buf, ".complete_with({})", string_array(candidates));
    }
    if let Some(command_name) = &param.command_name {
        w!(buf, ".command_name({:?})", command_name);
    }
}

fn emit_value(buf: &mut String, value: &ast::ValueEnum) {
    w!(buf, "impl declflags::Value for {} {{\n", value.name);
    w!(buf, "    const KIND: declflags::ValueKind = declflags::ValueKind::Enum;\n");
    blank_line(buf);
    w!(buf, "    fn parse_token(token: &str) -> ::std::result::Result<Self, declflags::CoerceError> {{\n");
    w!(
        buf,
        "        let idx = declflags::coerce::variant_index(token, <Self as declflags::Value>::variants(), {:?})?;\n",
        value.name
    );
    w!(buf, "        match idx {{\n");
    let (last, init) = value.variants.split_last().map_or((None, &[][..]), |(l, i)| (Some(l), i));
    for (idx, variant) in init.iter().enumerate() {
        w!(buf, "            {} => Ok({}::{}),\n", idx, value.name, variant);
    }
    if let Some(last) = last {
        w!(buf, "            _ => Ok({}::{}),\n", value.name, last);
    }
    w!(buf, "        }}\n");
    w!(buf, "    }}\n");
    blank_line(buf);
    w!(buf, "    fn absent() -> ::std::option::Option<Self> {{\n");
    if let Some(first) = value.variants.first() {
        w!(buf, "        Some({}::{})\n", value.name, first);
    } else {
        w!(buf, "        None\n");
    }
    w!(buf, "    }}\n");
    blank_line(buf);
    w!(buf, "    fn variants() -> &'static [&'static str] {{\n");
    w!(buf, "        &{}\n", string_array(&value.variants));
    w!(buf, "    }}\n");
    w!(buf, "}}\n");
}

fn emit_group(buf: &mut String, group: &ast::GroupStruct) {
    w!(buf, "impl declflags::Group for {} {{\n", group.name);

    w!(buf, "    fn has_property(property: &str) -> bool {{\n");
    if group.fields.is_empty() {
        w!(buf, "        let _ = property;\n");
        w!(buf, "        false\n");
    } else {
        let names = group.fields.iter().map(|it| format!("{:?}", it.ident())).collect::<Vec<_>>();
        w!(buf, "        matches!(property, {})\n", names.join(" | "));
    }
    w!(buf, "    }}\n");
    blank_line(buf);

    w!(
        buf,
        "    fn assign(&mut self, property: &str, token: &str) -> ::std::result::Result<(), declflags::CoerceError> {{\n"
    );
    w!(buf, "        match property {{\n");
    for field in &group.fields {
        w!(
            buf,
            "            {:?} => self.{} = declflags::coerce::coerce(Some(token))?,\n",
            field.ident(),
            field.name
        );
    }
    w!(buf, "            _ => {{\n");
    w!(buf, "                return Err(declflags::CoerceError::UnknownProperty {{\n");
    w!(buf, "                    property: property.to_string(),\n");
    w!(buf, "                    ty: {:?},\n", group.name);
    w!(buf, "                }})\n");
    w!(buf, "            }}\n");
    w!(buf, "        }}\n");
    w!(buf, "        Ok(())\n");
    w!(buf, "    }}\n");
    blank_line(buf);

    w!(buf, "    fn variants(property: &str) -> &'static [&'static str] {{\n");
    w!(buf, "        match property {{\n");
    for field in &group.fields {
        w!(
            buf,
            "            {:?} => <{} as declflags::Value>::variants(),\n",
            field.ident(),
            field.ty
        );
    }
    w!(buf, "            _ => &[],\n");
    w!(buf, "        }}\n");
    w!(buf, "    }}\n");
    w!(buf, "}}\n");
}

impl ast::Field {
    /// The field name without a raw identifier prefix.
    fn ident(&self) -> &str {
        self.name.strip_prefix("r#").unwrap_or(&self.name)
    }
}

fn string_array(items: &[String]) -> String {
    let items = items.iter().map(|it| format!("{:?}", it)).collect::<Vec<_>>();
    format!("[{}]", items.join(", "))
}

fn blank_line(buf: &mut String) {
    w!(buf, "\n");
}
