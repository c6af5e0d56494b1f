#![deny(missing_docs)]

//! # TypeScript Rendering
//!
//! Turns a finished [`DeclarationGraph`] into TypeScript source text. The
//! graph's ordered views do the hard work; this module only walks them and
//! writes module-wrapped classes and enums.
//!
//! Classes get a `constructor(data: any)` that assigns each field through
//! its declaration's assignment expression, so mapped types with custom
//! assignment templates (e.g. `LocalDate.fromJSON({0})`) are honored at
//! deserialization points.

use crate::graph::{DeclId, Declaration, DeclarationGraph};

/// Renders the full TypeScript output for a resolved graph.
///
/// # Arguments
///
/// * `graph` - The finished declaration graph.
/// * `debug` - Embed per-declaration annotation comments in the output.
pub fn render(graph: &DeclarationGraph, debug: bool) -> String {
    let mut code = String::new();

    for decl_id in graph.structured_in_emit_order() {
        render_class(graph, decl_id, debug, &mut code);
    }

    for (module, enums) in graph.enum_groups() {
        code.push_str(&format!("module {} {{\n", module));
        for (index, enum_id) in enums.iter().enumerate() {
            if index > 0 {
                code.push('\n');
            }
            render_enum(graph, *enum_id, debug, &mut code);
        }
        code.push_str("}\n\n");
    }

    code
}

fn render_class(graph: &DeclarationGraph, id: DeclId, debug: bool, code: &mut String) {
    let Declaration::Structured(decl) = graph.get(id) else {
        return;
    };

    if debug {
        code.push_str(&format!(
            "// {}.{} depth={}\n",
            decl.module, decl.name, decl.depth
        ));
    }
    code.push_str(&format!("module {} {{\n", decl.module));

    let extends = match decl.base {
        Some(base) => format!(" extends {}", graph.reference_name(base)),
        None => String::new(),
    };
    code.push_str(&format!("    export class {}{} {{\n", decl.name, extends));

    for member in &decl.members {
        code.push_str(&format!(
            "        {}: {};\n",
            member.name,
            graph.reference_name(member.ty)
        ));
    }

    code.push('\n');
    code.push_str("        constructor(data: any) {\n");
    if decl.base.is_some() {
        code.push_str("            super(data);\n");
    }
    for member in &decl.members {
        let source = format!("data.{}", member.name);
        code.push_str(&format!(
            "            this.{} = {};\n",
            member.name,
            assignment_expr(graph, member.ty, &source)
        ));
    }
    code.push_str("        }\n");

    code.push_str("    }\n");
    code.push_str("}\n\n");
}

fn render_enum(graph: &DeclarationGraph, id: DeclId, debug: bool, code: &mut String) {
    let Declaration::Enumeration(decl) = graph.get(id) else {
        return;
    };

    if debug {
        code.push_str(&format!("    // {}.{}\n", decl.module, decl.name));
    }
    code.push_str(&format!("    export enum {} {{\n", decl.name));
    for member in &decl.members {
        code.push_str(&format!("        {} = {},\n", member.name, member.value));
    }
    code.push_str("    }\n");
}

/// The right-hand side of a field assignment from `source`.
fn assignment_expr(graph: &DeclarationGraph, ty: DeclId, source: &str) -> String {
    match graph.get(ty) {
        Declaration::Mapped {
            assignment_template,
            ..
        } => assignment_template.replace("{0}", source),
        Declaration::Structured(_) => {
            format!("{} ? new {}({}) : {}", source, graph.reference_name(ty), source, source)
        }
        Declaration::Sequence { item } => format!(
            "({} || []).map((item: any) => {})",
            source,
            assignment_expr(graph, *item, "item")
        ),
        Declaration::Enumeration(_) | Declaration::Dictionary { .. } => source.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::MappingTable;
    use crate::resolver::Resolver;
    use crate::universe::UniverseBuilder;
    use pretty_assertions::assert_eq;

    fn order_graph() -> DeclarationGraph {
        let mut builder = UniverseBuilder::new();
        let entity = builder.class("Demo", "Entity", None);
        let string = builder.primitive("System.String");
        builder.member(entity, "Id", string);
        let status = builder.enumeration("Demo", "OrderStatus", &[("Pending", 0), ("Shipped", 1)]);
        let item = builder.class("Demo", "LineItem", None);
        builder.member(item, "Name", string);
        let items = builder.list(item);
        let order = builder.class("Demo", "Order", Some(entity));
        builder.member(order, "Status", status);
        builder.member(order, "Items", items);
        let universe = builder.build();

        let table = MappingTable::built_in();
        Resolver::new(&universe, &table).resolve_all([order])
    }

    #[test]
    fn test_render_order_scenario() {
        let code = render(&order_graph(), false);

        let expected = "\
module Demo {
    export class Entity {
        Id: string;

        constructor(data: any) {
            this.Id = data.Id;
        }
    }
}

module Demo {
    export class LineItem {
        Name: string;

        constructor(data: any) {
            this.Name = data.Name;
        }
    }
}

module Demo {
    export class Order extends Demo.Entity {
        Status: Demo.OrderStatus;
        Items: Demo.LineItem[];

        constructor(data: any) {
            super(data);
            this.Status = data.Status;
            this.Items = (data.Items || []).map((item: any) => item ? new Demo.LineItem(item) : item);
        }
    }
}

module Demo {
    export enum OrderStatus {
        Pending = 0,
        Shipped = 1,
    }
}

";
        assert_eq!(code, expected);
    }

    #[test]
    fn test_debug_annotations() {
        let code = render(&order_graph(), true);
        assert!(code.contains("// Demo.Entity depth=0\n"));
        assert!(code.contains("// Demo.Order depth=1\n"));
        assert!(code.contains("    // Demo.OrderStatus\n"));
    }

    #[test]
    fn test_custom_assignment_template() {
        let mut builder = UniverseBuilder::new();
        let date = builder.primitive("NodaTime.LocalDate");
        let holder = builder.class("Demo", "Holder", None);
        builder.member(holder, "When", date);
        let universe = builder.build();

        let custom = crate::mapping::MappingRule::full_names(
            &["NodaTime.LocalDate"],
            "LocalDate",
            "LocalDate.fromJSON({0})",
        );
        let table = MappingTable::with_custom(vec![custom]);
        let graph = Resolver::new(&universe, &table).resolve_all([holder]);

        let code = render(&graph, false);
        assert!(code.contains("When: LocalDate;"));
        assert!(code.contains("this.When = LocalDate.fromJSON(data.When);"));
    }
}
