use std::collections::HashSet;

use command_tree_core::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn text(name: &str) -> Parameter {
    Parameter::required(name, ParameterType::Primitive(Primitive::String))
}

fn build(descriptors: Vec<CommandDescriptor>) -> CommandTree {
    let mut builder = TreeBuilder::new();
    builder.register_all(descriptors);
    builder.build().unwrap()
}

/// Stands in for the remote platform: assigns sequential identifiers to the
/// exported records, keeping their name/kind/options shape.
fn register(schema: &[SchemaNode]) -> Vec<RemoteCommandRecord> {
    schema
        .iter()
        .enumerate()
        .map(|(index, node)| RemoteCommandRecord::from_schema(node, 1000 + index as u64))
        .collect()
}

fn bot_descriptors() -> Vec<CommandDescriptor> {
    vec![
        CommandDescriptor::command(&["ping"]).with_description("Check latency"),
        CommandDescriptor::group(&["mod"]).with_description("Moderation"),
        CommandDescriptor::command(&["mod", "ban"])
            .with_parameter(Parameter::required("user", ParameterType::Entity(EntityKind::Member)))
            .with_parameter(Parameter::optional("days", ParameterType::Primitive(Primitive::U8))),
        CommandDescriptor::command(&["mod", "kick"])
            .with_parameter(Parameter::required("user", ParameterType::Entity(EntityKind::Member))),
        CommandDescriptor::command(&["mod", "roles", "grant"])
            .with_parameter(Parameter::required("role", ParameterType::Entity(EntityKind::Role))),
        CommandDescriptor::command(&["mod", "roles", "revoke"])
            .with_parameter(Parameter::required("role", ParameterType::Entity(EntityKind::Role))),
        CommandDescriptor::command(&["config", "prefix"]).with_parameter(text("value")),
        CommandDescriptor::user_context(&["Profile"]),
        CommandDescriptor::message_context(&["Report"]),
    ]
}

// ---------------------------------------------------------------------------
// Round trip: export -> remote registration -> mapping
// ---------------------------------------------------------------------------

#[test]
fn test_round_trip_maps_every_command_once() {
    let tree = build(bot_descriptors());
    let schema = tree.export().unwrap();
    let records = register(&schema);

    let entries = tree.map_remote(&records);
    assert_eq!(entries.len(), schema.len());

    let mut seen = HashSet::new();
    for entry in &entries {
        for id in entry.commands() {
            assert!(seen.insert(id), "{} mapped twice", tree.dotted_path(id));
        }
    }
    let all: HashSet<_> = tree.commands().map(|command| command.id).collect();
    assert_eq!(seen, all);
}

#[test]
fn test_round_trip_through_json() {
    let tree = build(bot_descriptors());
    let json = serde_json::to_string(&register(&tree.export().unwrap())).unwrap();
    let records: Vec<RemoteCommandRecord> = serde_json::from_str(&json).unwrap();

    let entries = map_remote_commands(&tree, &records);
    let MappingTarget::Group(paths) = &entries[1].target else {
        panic!("expected the moderation group");
    };
    let keys: Vec<_> = paths.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["mod::ban", "mod::kick", "mod::roles::grant", "mod::roles::revoke"]);
    assert_eq!(entries[1].key.command_id, RemoteId::from(1001u64));
    assert!(entries.iter().all(|entry| entry.key.group_id.is_none()));
}

// ---------------------------------------------------------------------------
// Export scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_top_level_command_and_group_scenario() {
    let tree = build(vec![
        CommandDescriptor::command(&["top-level-command"]),
        CommandDescriptor::command(&["top-level-group", "nested-command"]),
        CommandDescriptor::command(&["top-level-group", "nested-group", "deep-command"]),
    ]);

    let schema = export_tree(&tree).unwrap();
    assert_eq!(schema.len(), 2);

    let group = &schema[1];
    assert_eq!(group.options.len(), 2);
    assert_eq!(group.options[0].kind, SchemaKind::SubCommand);
    assert_eq!(group.options[1].kind, SchemaKind::SubCommandGroup);
    assert_eq!(group.options[1].options.len(), 1);
}

#[test]
fn test_root_order_is_preserved() {
    let tree = build(bot_descriptors());
    let names: Vec<_> = tree.export().unwrap().into_iter().map(|node| node.name).collect();
    assert_eq!(names, vec!["ping", "mod", "config", "Profile", "Report"]);
}

// ---------------------------------------------------------------------------
// Merge, pruning and overloads
// ---------------------------------------------------------------------------

#[test]
fn test_sources_merge_into_one_group() {
    let mut builder = TreeBuilder::new();
    builder.register_all(vec![
        CommandDescriptor::command(&["mod", "ban"]),
        CommandDescriptor::command(&["mod", "kick"]),
    ]);
    builder.register_all(vec![
        CommandDescriptor::group(&["mod"]).with_description("Moderation"),
        CommandDescriptor::command(&["mod", "warn"]),
        CommandDescriptor::command(&["mod", "ban"]).with_parameter(text("reason")),
    ]);
    let tree = builder.build().unwrap();

    assert_eq!(tree.root().children().len(), 1);
    let group = tree.find_child(Parent::Root, "mod").unwrap();
    assert_eq!(group.description(), Some("Moderation"));
    let keys: Vec<_> = tree.children(Parent::Group(group.id())).map(Node::key).collect();
    assert_eq!(keys, vec!["ban", "kick", "warn", "ban"]);

    assert!(tree.search("mod ban").unwrap().parameters.is_empty());
    assert_eq!(tree.search("mod ban spam").unwrap().parameters.len(), 1);
}

#[test]
fn test_excluded_children_prune_ancestors() {
    let tree = build(vec![
        CommandDescriptor::command(&["ping"]),
        CommandDescriptor::command(&["debug", "cache", "dump"]).excluded(),
        CommandDescriptor::command(&["debug", "cache", "clear"]).excluded(),
    ]);

    assert_eq!(tree.len(), 1);
    assert!(tree.find_child(Parent::Root, "debug").is_none());
    assert_eq!(tree.export().unwrap().len(), 1);
}

#[test]
fn test_overloads_dispatch_but_do_not_export() {
    let root_overload = build(vec![
        CommandDescriptor::command(&["echo"]),
        CommandDescriptor::command(&["echo"]).with_parameter(text("value")),
    ]);
    assert!(root_overload.search("echo hi").is_ok());
    assert_eq!(
        root_overload.export().unwrap_err(),
        BuildError::DuplicateRootOverload("echo".into())
    );

    let group_overload = build(vec![
        CommandDescriptor::command(&["util", "echo"]),
        CommandDescriptor::command(&["util", "echo"]).with_parameter(text("value")),
    ]);
    assert!(group_overload.search("util echo").is_ok());
    assert_eq!(
        group_overload.export().unwrap_err(),
        BuildError::DuplicateGroupOverload("util::echo".into())
    );
}

#[test]
fn test_depth_limit() {
    let mut builder = TreeBuilder::new();
    builder.register(CommandDescriptor::command(&["a", "b", "c", "d"]));
    assert_eq!(
        builder.build().unwrap_err(),
        BuildError::TooDeeplyNested("a::b::c::d".into())
    );
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

#[test]
fn test_dispatch_scenarios() {
    let tree = build(bot_descriptors());

    assert_eq!(tree.dotted_path(tree.search("mod ban alice 7").unwrap().id), "mod::ban");
    assert_eq!(tree.dotted_path(tree.search("mod roles revoke admins").unwrap().id), "mod::roles::revoke");
    assert_eq!(tree.dotted_path(tree.search(r#"config prefix "! ""#).unwrap().id), "config::prefix");
    assert_eq!(tree.search("mod unban alice").unwrap_err(), SearchError::NoMatch);
    assert_eq!(tree.search("mod roles").unwrap_err(), SearchError::NoMatch);
}

#[test]
fn test_tree_is_shareable_across_threads() {
    let tree = std::sync::Arc::new(build(bot_descriptors()));
    let handles: Vec<_> = ["ping", "mod kick bob", "config prefix ?"]
        .into_iter()
        .map(|input| {
            let tree = std::sync::Arc::clone(&tree);
            std::thread::spawn(move || tree.search(input).map(|command| command.id))
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap().is_ok());
    }
}
