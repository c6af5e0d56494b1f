//! End-to-end resolution scenarios over programmatically built universes.

use pretty_assertions::assert_eq;
use tsmapper_core::{
    collect_roots, render, Declaration, MappingRule, MappingTable, Operation, Parameter, Resolver,
    UniverseBuilder,
};

#[test]
fn order_scenario_resolves_expected_graph() {
    // Order derives from Entity (itself deriving only from the universal
    // root) and carries an enum member and a list member.
    let mut builder = UniverseBuilder::new();
    let object = builder.primitive("System.Object");
    let entity = builder.class("Demo", "Entity", Some(object));
    let status = builder.enumeration("Demo", "OrderStatus", &[("Pending", 0), ("Shipped", 1)]);
    let line_item = builder.class("Demo", "LineItem", None);
    let items = builder.list(line_item);
    let order = builder.class("Demo", "Order", Some(entity));
    builder.member(order, "Status", status);
    builder.member(order, "Items", items);
    let universe = builder.build();

    let table = MappingTable::built_in();
    let graph = Resolver::new(&universe, &table).resolve_all([order]);

    let entity_decl = graph.lookup(entity).expect("entity resolved");
    let order_decl = graph.lookup(order).expect("order resolved");
    let item_decl = graph.lookup(line_item).expect("line item resolved");

    let Declaration::Structured(entity_struct) = graph.get(entity_decl) else {
        panic!("expected structured entity");
    };
    assert_eq!(entity_struct.depth, 0);
    assert_eq!(entity_struct.base, None);

    let Declaration::Structured(order_struct) = graph.get(order_decl) else {
        panic!("expected structured order");
    };
    assert_eq!(order_struct.depth, 1);
    assert_eq!(order_struct.base, Some(entity_decl));
    assert_eq!(order_struct.members.len(), 2);
    assert_eq!(order_struct.members[0].name, "Status");
    assert_eq!(order_struct.members[1].name, "Items");

    let Declaration::Sequence { item } = graph.get(order_struct.members[1].ty) else {
        panic!("expected sequence of line items");
    };
    assert_eq!(*item, item_decl);

    let Declaration::Structured(item_struct) = graph.get(item_decl) else {
        panic!("expected structured line item");
    };
    assert_eq!(item_struct.depth, 0);

    // OrderStatus appears exactly once in the grouped enum output.
    let groups = graph.enum_groups();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].0, "Demo");
    assert_eq!(groups[0].1.len(), 1);

    // Emission order: both depth-0 classes before the depth-1 Order.
    let ordered = graph.structured_in_emit_order();
    assert_eq!(ordered, vec![entity_decl, item_decl, order_decl]);
}

#[test]
fn dictionary_of_string_to_int_resolves_mapped_leaves() {
    let mut builder = UniverseBuilder::new();
    let string = builder.primitive("System.String");
    let int = builder.primitive("System.Int32");
    let dict = builder.dictionary(string, int);
    let holder = builder.class("Demo", "Holder", None);
    builder.member(holder, "Counts", dict);
    let universe = builder.build();

    let table = MappingTable::built_in();
    let graph = Resolver::new(&universe, &table).resolve_all([holder]);

    let dict_decl = graph.lookup(dict).expect("dictionary resolved");
    let Declaration::Dictionary { key, value } = graph.get(dict_decl) else {
        panic!("expected dictionary");
    };
    assert_eq!(
        graph.get(*key),
        &Declaration::Mapped {
            destination: "string".to_string(),
            assignment_template: "{0}".to_string(),
        }
    );
    assert_eq!(
        graph.get(*value),
        &Declaration::Mapped {
            destination: "number".to_string(),
            assignment_template: "{0}".to_string(),
        }
    );
    assert_eq!(
        graph.reference_name(dict_decl),
        "{ key:string; value:number }[]"
    );
}

#[test]
fn custom_rule_overrides_built_in() {
    let mut builder = UniverseBuilder::new();
    let date = builder.primitive("System.DateTime");
    let holder = builder.class("Demo", "Holder", None);
    builder.member(holder, "When", date);
    let universe = builder.build();

    let custom = MappingRule::full_names(&["System.DateTime"], "Date", "{0}");
    let table = MappingTable::with_custom(vec![custom]);
    let graph = Resolver::new(&universe, &table).resolve_all([holder]);

    let decl = graph.lookup(date).expect("date resolved");
    let Declaration::Mapped { destination, .. } = graph.get(decl) else {
        panic!("expected mapped");
    };
    assert_eq!(destination, "Date");
}

#[test]
fn char_enumerable_resolves_to_string_not_sequence() {
    let mut builder = UniverseBuilder::new();
    let ch = builder.primitive("System.Char");
    let chars = builder.enumerable(ch);
    let universe = builder.build();

    let table = MappingTable::built_in();
    let mut resolver = Resolver::new(&universe, &table);
    let decl = resolver.resolve(chars);

    let Declaration::Mapped { destination, .. } = resolver.graph().get(decl) else {
        panic!("expected mapped, not sequence");
    };
    assert_eq!(destination, "string");
}

#[test]
fn char_array_resolves_to_sequence_of_string() {
    let mut builder = UniverseBuilder::new();
    let ch = builder.primitive("System.Char");
    let char_array = builder.array(ch);
    let universe = builder.build();

    let table = MappingTable::built_in();
    let mut resolver = Resolver::new(&universe, &table);
    let decl = resolver.resolve(char_array);

    let Declaration::Sequence { item } = resolver.graph().get(decl) else {
        panic!("expected sequence");
    };
    let Declaration::Mapped { destination, .. } = resolver.graph().get(*item) else {
        panic!("expected mapped item");
    };
    assert_eq!(destination, "string");
    assert_eq!(resolver.graph().reference_name(decl), "string[]");
}

#[test]
fn full_pipeline_from_scan_to_render() {
    let mut builder = UniverseBuilder::new();
    let object = builder.primitive("System.Object");
    let string = builder.primitive("System.String");
    let token = builder.class("System.Threading", "CancellationToken", None);
    let entity = builder.class("Shop", "Entity", Some(object));
    builder.member(entity, "Id", string);
    let order = builder.class("Shop", "Order", Some(entity));
    let status = builder.enumeration("Shop", "OrderStatus", &[("Pending", 0), ("Shipped", 1)]);
    let nullable_status = builder.nullable(status);
    builder.member(order, "Status", status);
    builder.member(order, "PreviousStatus", nullable_status);
    builder.service(
        "OrdersController",
        vec![Operation {
            name: "Get".to_string(),
            response_types: vec![order],
            parameters: vec![Parameter {
                name: "cancellationToken".to_string(),
                ty: token,
            }],
        }],
    );
    let universe = builder.build();

    let roots = collect_roots(&universe);
    assert_eq!(roots.len(), 1);

    let table = MappingTable::built_in();
    let graph = Resolver::new(&universe, &table).resolve_all(roots);
    let code = render(&graph, false);

    assert!(code.contains("export class Entity {"));
    assert!(code.contains("export class Order extends Shop.Entity {"));
    assert!(code.contains("Status: Shop.OrderStatus;"));
    // The nullable form shares the raw enum's declaration.
    assert!(code.contains("PreviousStatus: Shop.OrderStatus;"));
    assert_eq!(code.matches("export enum OrderStatus").count(), 1);
    // The cancellation parameter never became a declaration.
    assert!(!code.contains("CancellationToken"));
}
