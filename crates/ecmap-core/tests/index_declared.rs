use ecmap_core::index::Transition;
use ecmap_core::schema::{
    app::{
        self, Class, ClassId, CustomAttribute, DbIndex, DbIndexList, ForeignKeyConstraint,
        IdentityKind, IdentitySpecification, MapStrategy, Modifier, Multiplicity,
        NavigationDirection, Property, Relationship, RelationshipEnd, ShareColumns,
    },
    db::{Index, IndexOrigin},
    Schema,
};
use ecmap_core::Error;
use pretty_assertions::assert_eq;

fn build(app: app::Schema) -> Schema {
    Schema::builder().build(app).unwrap()
}

fn build_err(app: app::Schema) -> Error {
    Schema::builder().build(app).unwrap_err()
}

fn index_names(schema: &Schema, table: &str) -> Vec<String> {
    schema
        .db
        .table_by_name(table)
        .unwrap_or_else(|| panic!("no table {table}"))
        .indices
        .iter()
        .map(|index| index.name.clone())
        .collect()
}

fn index<'a>(schema: &'a Schema, name: &str) -> &'a Index {
    schema
        .db
        .index_by_name(name)
        .unwrap_or_else(|| panic!("no index {name}"))
}

fn column_names(schema: &Schema, index: &Index) -> Vec<String> {
    index
        .columns
        .iter()
        .map(|column| schema.db.column(*column).name.clone())
        .collect()
}

fn indexes<const N: usize>(indexes: [DbIndex; N]) -> DbIndexList {
    DbIndexList::new(indexes)
}

/// A sealed class in its own table with a `Code` and a `Label`.
fn sealed(app: &mut app::Schema, name: &str, list: DbIndexList) -> ClassId {
    app.add(
        Class::entity("ts", name)
            .sealed()
            .property(Property::primitive("Code"))
            .property(Property::primitive("Label"))
            .custom_attribute(list),
    )
}

#[test]
fn redundant_declarations_yield_to_system_indexes() {
    let mut app = app::Schema::new();
    app.add(
        Class::entity("ts", "Foo")
            .custom_attribute(MapStrategy::TablePerHierarchy)
            .custom_attribute(indexes([
                DbIndex::new("ix_foo_id", ["ECInstanceId"]),
                DbIndex::unique("uix_foo_classid", ["ECClassId"]),
            ])),
    );

    let schema = build(app);

    assert_eq!(
        index_names(&schema, "ts_Foo"),
        ["pk_ts_Foo", "ix_ts_Foo_ecclassid", "uix_foo_classid"]
    );

    let unique = index(&schema, "uix_foo_classid");
    assert!(unique.unique);
    assert_eq!(unique.predicate, None);
    assert_eq!(unique.origin, IndexOrigin::Declared { class: ClassId(0) });
    assert_eq!(column_names(&schema, unique), ["ECClassId"]);
}

#[test]
fn unique_instance_id_declaration_is_absorbed() {
    let mut app = app::Schema::new();
    sealed(
        &mut app,
        "Foo",
        indexes([DbIndex::unique("uix_foo_id", ["ECInstanceId"])]),
    );

    let schema = build(app);
    assert_eq!(index_names(&schema, "ts_Foo"), ["pk_ts_Foo"]);
    assert!(schema.db.index_by_name("uix_foo_id").is_none());

    // With a separate instance id index the declaration folds into it
    let mut app = app::Schema::new();
    sealed(
        &mut app,
        "Foo",
        indexes([DbIndex::unique("uix_foo_id", ["ECInstanceId"])]),
    );

    let schema = Schema::builder()
        .primary_key_covers_instance_id(false)
        .build(app)
        .unwrap();
    assert_eq!(index_names(&schema, "ts_Foo"), ["pk_ts_Foo", "uix_ts_Foo_id"]);
    assert!(index(&schema, "uix_ts_Foo_id").is_system());
}

#[test]
fn not_null_filter_skips_non_nullable_columns() {
    let mut app = app::Schema::new();
    app.add(
        Class::entity("ts", "Foo")
            .sealed()
            .property(Property::primitive("Code").not_null())
            .property(Property::primitive("Label"))
            .custom_attribute(indexes([
                DbIndex::unique("uix_foo_code", ["Code"]).where_clause("IndexedColumnsAreNotNull"),
                DbIndex::new("ix_foo_code_label", ["Code", "Label"])
                    .where_clause("IndexedColumnsAreNotNull"),
            ])),
    );

    let schema = build(app);

    assert_eq!(index(&schema, "uix_foo_code").predicate, None);

    let both = index(&schema, "ix_foo_code_label");
    let label = schema
        .db
        .table_by_name("ts_Foo")
        .unwrap()
        .column_by_name("Label")
        .unwrap()
        .id;
    assert_eq!(both.predicate.as_ref().unwrap().not_null, [label]);
}

#[test]
fn restated_system_index_keeps_its_not_null_filter() {
    let mut app = app::Schema::new();
    let parent = app.add(Class::entity("ts", "Parent"));
    let child = app.add(Class::entity("ts", "Child").sealed());
    let rel = app.add(
        Class::relationship(
            "ts",
            "ParentHasChildren",
            Relationship::new(
                RelationshipEnd::new(Multiplicity::ZERO_ONE, parent),
                RelationshipEnd::new(Multiplicity::ZERO_MANY, child),
            ),
        )
        .custom_attribute(ForeignKeyConstraint::default()),
    );
    app.add_property(
        child,
        Property::navigation("Parent", rel, NavigationDirection::Backward),
    );
    app.add_custom_attribute(
        child,
        indexes([
            DbIndex::new("ix_ts_Child_fk_ts_ParentHasChildren_target", ["Parent.Id"])
                .where_clause("IndexedColumnsAreNotNull"),
        ]),
    );

    let schema = build(app);
    let fk = index(&schema, "ix_ts_Child_fk_ts_ParentHasChildren_target");

    assert!(fk.is_system());
    assert_eq!(column_names(&schema, fk), ["ParentId"]);
    assert_eq!(fk.predicate.as_ref().unwrap().not_null, fk.columns);
    assert_eq!(
        index_names(&schema, "ts_Child")
            .iter()
            .filter(|name| name.contains("_fk_"))
            .count(),
        1
    );
}

#[test]
fn link_table_declarations() {
    let mut app = app::Schema::new();
    let parent = app.add(Class::entity("ts", "Parent"));
    let child = app.add(Class::entity("ts", "Child"));
    app.add(
        Class::relationship(
            "ts",
            "ParentHasChildren",
            Relationship::new(
                RelationshipEnd::new(Multiplicity::ONE_ONE, parent),
                RelationshipEnd::new(Multiplicity::ZERO_MANY, child),
            ),
        )
        .custom_attribute(MapStrategy::TablePerHierarchy)
        .property(Property::primitive("Order"))
        .custom_attribute(indexes([
            DbIndex::new("ix_rel_source_order", ["SourceECInstanceId", "Order"]),
            DbIndex::new("ix_rel_order_target", ["Order", "TargetECInstanceId"]),
        ])),
    );

    let schema = build(app);

    assert_eq!(
        index_names(&schema, "ts_ParentHasChildren"),
        [
            "pk_ts_ParentHasChildren",
            "ix_ts_ParentHasChildren_ecclassid",
            "ix_ts_ParentHasChildren_source",
            "ix_ts_ParentHasChildren_target",
            "uix_ts_ParentHasChildren_sourcetargetclassid",
            "ix_rel_source_order",
            "ix_rel_order_target"
        ]
    );
    assert_eq!(
        column_names(&schema, index(&schema, "ix_rel_source_order")),
        ["SourceId", "Order"]
    );
    assert_eq!(
        column_names(&schema, index(&schema, "ix_rel_order_target")),
        ["Order", "TargetId"]
    );
    assert_eq!(
        column_names(
            &schema,
            index(&schema, "uix_ts_ParentHasChildren_sourcetargetclassid")
        ),
        ["SourceId", "TargetId", "ECClassId"]
    );
}

#[test]
fn virtual_columns_cannot_be_indexed() {
    let mut app = app::Schema::new();
    let parent = app.add(Class::entity("ts", "Parent"));
    let child = app.add(Class::entity("ts", "Child").sealed());
    let rel = app.add(
        Class::relationship(
            "ts",
            "ParentHasChildren",
            Relationship::new(
                RelationshipEnd::new(Multiplicity::ONE_ONE, parent),
                RelationshipEnd::new(Multiplicity::ZERO_MANY, child),
            ),
        )
        .sealed(),
    );
    app.add_property(
        child,
        Property::navigation("Parent", rel, NavigationDirection::Backward),
    );
    app.add_custom_attribute(
        child,
        indexes([DbIndex::unique(
            "uix_parentrelclassid",
            ["Parent.RelECClassId"],
        )]),
    );

    let err = build_err(app);

    assert!(err.is_invalid_indexed_property(), "{err}");
    assert!(err.root_cause().is_adhoc());
    assert_eq!(
        err.to_string(),
        "index 'uix_parentrelclassid' cannot include 'Parent.RelECClassId': \
         column 'ParentRelECClassId' is virtual"
    );
}

#[test]
fn navigation_id_is_indexable() {
    let mut app = app::Schema::new();
    let parent = app.add(Class::entity("ts", "Parent"));
    let child = app.add(Class::entity("ts", "Child").sealed());
    let rel = app.add(Class::relationship(
        "ts",
        "ParentHasChildren",
        Relationship::new(
            RelationshipEnd::new(Multiplicity::ZERO_ONE, parent),
            RelationshipEnd::new(Multiplicity::ZERO_MANY, child),
        ),
    ));
    app.add_property(
        child,
        Property::navigation("Parent", rel, NavigationDirection::Backward),
    );
    app.add_custom_attribute(
        child,
        indexes([DbIndex::new("ix_child_parent", ["Parent.Id"])
            .where_clause("IndexedColumnsAreNotNull")]),
    );

    let schema = build(app);
    let ix = index(&schema, "ix_child_parent");

    assert_eq!(column_names(&schema, ix), ["ParentId"]);
    assert_eq!(ix.predicate.as_ref().unwrap().not_null, ix.columns);
    assert!(!ix.extendable);
}

#[test]
fn hierarchy_members_filter_by_class_id() {
    let mut app = app::Schema::new();
    let element = app.add(
        Class::entity("ts", "Element").custom_attribute(MapStrategy::TablePerHierarchy),
    );
    let widget = app.add(
        Class::entity("ts", "Widget")
            .extends(element)
            .property(Property::primitive("Code"))
            .custom_attribute(indexes([DbIndex::unique("uix_widget_code", ["Code"])
                .where_clause("IndexedColumnsAreNotNull")])),
    );
    let gadget = app.add(Class::entity("ts", "Gadget").extends(widget));

    let schema = build(app);
    let ix = index(&schema, "uix_widget_code");
    let table = schema.db.table_by_name("ts_Element").unwrap();

    let predicate = ix.predicate.as_ref().unwrap();
    assert_eq!(predicate.not_null, [table.column_by_name("Code").unwrap().id]);

    let filter = predicate.class_ids.as_ref().unwrap();
    assert_eq!(filter.column, table.class_id_column().unwrap().id);
    assert_eq!(filter.classes, [widget, gadget]);
    assert!(ix.extendable);
}

#[test]
fn shared_columns_are_indexable() {
    let mut app = app::Schema::new();
    let element = app.add(
        Class::entity("ts", "Element")
            .custom_attribute(MapStrategy::TablePerHierarchy)
            .custom_attribute(ShareColumns {
                apply_to_subclasses_only: true,
                max_shared_columns_before_overflow: None,
            }),
    );
    app.add(
        Class::entity("ts", "Widget")
            .extends(element)
            .property(Property::primitive("Code"))
            .custom_attribute(indexes([DbIndex::new("ix_widget_code", ["Code"])])),
    );

    let schema = build(app);

    assert_eq!(
        column_names(&schema, index(&schema, "ix_widget_code")),
        ["ps1"]
    );
}

#[test]
fn abstract_class_hands_index_to_sealed_subclass() {
    let mut app = app::Schema::new();
    let shape = app.add(
        Class::entity("ts", "Shape")
            .modifier(Modifier::Abstract)
            .property(Property::primitive("Area"))
            .custom_attribute(indexes([DbIndex::new("ix_area", ["Area"])])),
    );
    let circle = app.add(Class::entity("ts", "Circle").extends(shape).sealed());

    let schema = build(app);
    let ix = index(&schema, "ix_area_ts_Circle");

    assert_eq!(ix.on, schema.table_for(circle).unwrap().id);
    assert_eq!(ix.origin, IndexOrigin::Declared { class: shape });
    assert_eq!(column_names(&schema, ix), ["Area"]);
    assert!(schema.db.index_by_name("ix_area").is_none());
}

#[test]
fn illegal_scopes() {
    // Extensible class in its own table
    let mut app = app::Schema::new();
    app.add(
        Class::entity("ts", "Foo")
            .property(Property::primitive("Code"))
            .custom_attribute(indexes([DbIndex::unique("uix_code", ["Code"])])),
    );
    let err = build_err(app);
    assert!(err.is_illegal_unique_index_scope(), "{err}");
    assert_eq!(
        err.to_string(),
        "unique index 'uix_code' is not allowed on 'ts:Foo'"
    );

    // Abstract class with two subclasses
    let mut app = app::Schema::new();
    let shape = app.add(
        Class::entity("ts", "Shape")
            .modifier(Modifier::Abstract)
            .property(Property::primitive("Area"))
            .custom_attribute(indexes([DbIndex::new("ix_area", ["Area"])])),
    );
    app.add(Class::entity("ts", "Circle").extends(shape).sealed());
    app.add(Class::entity("ts", "Square").extends(shape).sealed());
    let err = build_err(app);
    assert!(err.is_illegal_index_scope(), "{err}");

    // Abstract class whose only subclass is extensible
    let mut app = app::Schema::new();
    let shape = app.add(
        Class::entity("ts", "Shape")
            .modifier(Modifier::Abstract)
            .property(Property::primitive("Area"))
            .custom_attribute(indexes([DbIndex::new("ix_area", ["Area"])])),
    );
    app.add(Class::entity("ts", "Circle").extends(shape));
    let err = build_err(app);
    assert!(err.is_illegal_index_scope(), "{err}");

    // Existing tables are not ours to index
    let mut app = app::Schema::new();
    app.add(
        Class::entity("ts", "Legacy")
            .sealed()
            .custom_attribute(MapStrategy::ExistingTable("legacy".to_string()))
            .property(Property::primitive("Code"))
            .custom_attribute(indexes([DbIndex::new("ix_code", ["Code"])])),
    );
    let err = build_err(app);
    assert!(err.is_illegal_index_scope(), "{err}");
}

#[test]
fn identity_specifications_add_no_indexes() {
    let mut app = app::Schema::new();
    app.add(
        Class::entity("ts", "Element")
            .custom_attribute(MapStrategy::TablePerHierarchy)
            .property(Property::primitive("FederationGuid"))
            .custom_attribute(IdentitySpecification {
                kind: IdentityKind::GlobalId,
                property: "FederationGuid".to_string(),
            }),
    );

    let schema = build(app);

    assert_eq!(
        index_names(&schema, "ts_Element"),
        ["pk_ts_Element", "ix_ts_Element_ecclassid"]
    );
}

#[test]
fn mixins_cannot_declare_indexes() {
    let mut app = app::Schema::new();
    app.add(
        Class::mixin("ts", "Tagged")
            .property(Property::primitive("Tag"))
            .custom_attribute(indexes([DbIndex::new("ix_tag", ["Tag"])])),
    );

    let err = build_err(app);
    assert!(err.is_index_on_mixin_not_supported(), "{err}");
}

#[test]
fn malformed_declarations() {
    let cases: Vec<(CustomAttribute, &str)> = vec![
        (
            DbIndexList { indexes: None }.into(),
            "'Indexes' is missing or empty",
        ),
        (indexes([]).into(), "'Indexes' is missing or empty"),
        (
            indexes([DbIndex {
                properties: vec!["Code".to_string()],
                ..DbIndex::default()
            }])
            .into(),
            "'DbIndex' has no 'Name'",
        ),
        (
            indexes([DbIndex::new("ix_empty", Vec::<String>::new())]).into(),
            "index 'ix_empty' has no 'Properties'",
        ),
        (
            indexes([DbIndex::new("ix_code", ["Code"]).where_clause("NotNull")]).into(),
            "index 'ix_code' has unknown 'Where' token 'NotNull'",
        ),
        (
            indexes([
                DbIndex::new("ix_code", ["Code"]),
                DbIndex::new("ix_code", ["Code"]),
            ])
            .into(),
            "index 'ix_code' is declared twice",
        ),
    ];

    for (attribute, message) in cases {
        let mut app = app::Schema::new();
        app.add(
            Class::entity("ts", "Foo")
                .sealed()
                .property(Property::primitive("Code"))
                .custom_attribute(attribute),
        );

        let err = build_err(app);
        assert!(err.is_malformed_index_declaration(), "{err}");
        assert_eq!(
            err.to_string(),
            format!("malformed index declaration on 'ts:Foo': {message}")
        );
    }
}

#[test]
fn unresolvable_properties() {
    let cases = [
        ("Missing", false),
        ("Origin.W", false),
        // Reserved names are case-sensitive
        ("ecinstanceid", false),
        ("SourceECInstanceId", false),
        ("Address", true),
        ("Lines", true),
        ("Stops", true),
        ("Origin", true),
    ];

    for (access, not_scalar) in cases {
        let mut app = app::Schema::new();
        let address = app.add(Class::structure("ts", "Address").property(Property::primitive("City")));
        app.add(
            Class::entity("ts", "Site")
                .sealed()
                .property(Property::structure("Address", address))
                .property(Property::primitive_array("Lines"))
                .property(Property::struct_array("Stops", address))
                .property(Property::point2d("Origin"))
                .custom_attribute(indexes([DbIndex::new("ix_site", [access])])),
        );

        let err = build_err(app);
        assert!(err.is_invalid_indexed_property(), "{access}: {err}");

        let cause = err.root_cause();
        if not_scalar {
            assert!(cause.is_not_scalar(), "{access}: {err}");
        } else {
            assert!(cause.is_property_not_found(), "{access}: {err}");
        }
    }
}

#[test]
fn struct_members_and_point_axes_are_indexable() {
    let mut app = app::Schema::new();
    let address = app.add(Class::structure("ts", "Address").property(Property::primitive("City")));
    app.add(
        Class::entity("ts", "Site")
            .sealed()
            .property(Property::structure("Address", address))
            .property(Property::point2d("Origin"))
            .custom_attribute(indexes([DbIndex::new(
                "ix_site",
                ["Address.City", "Origin.Y", "ECInstanceId"],
            )])),
    );

    let schema = build(app);

    assert_eq!(
        column_names(&schema, index(&schema, "ix_site")),
        ["Address_City", "Origin_Y", "Id"]
    );
}

#[test]
fn joined_tables_cannot_be_indexed_together() {
    let mut app = app::Schema::new();
    let element = app.add(
        Class::entity("ts", "Element")
            .custom_attribute(MapStrategy::TablePerHierarchy)
            .custom_attribute(CustomAttribute::JoinedTablePerDirectSubclass)
            .property(Property::primitive("Code")),
    );
    app.add(
        Class::entity("ts", "Part")
            .extends(element)
            .property(Property::primitive("Weight"))
            .custom_attribute(indexes([
                DbIndex::new("ix_part_weight", ["Weight"]),
                DbIndex::new("ix_part_code_weight", ["Code", "Weight"]),
            ])),
    );

    let err = build_err(app);
    assert!(err.is_cross_table_index(), "{err}");
}

#[test]
fn joined_table_index() {
    let mut app = app::Schema::new();
    let element = app.add(
        Class::entity("ts", "Element")
            .custom_attribute(MapStrategy::TablePerHierarchy)
            .custom_attribute(CustomAttribute::JoinedTablePerDirectSubclass)
            .property(Property::primitive("Code")),
    );
    let part = app.add(
        Class::entity("ts", "Part")
            .extends(element)
            .property(Property::primitive("Weight"))
            .custom_attribute(indexes([DbIndex::new(
                "ix_part_weight",
                ["ECInstanceId", "Weight"],
            )])),
    );
    app.add(Class::entity("ts", "Bolt").extends(part));

    let schema = build(app);
    let ix = index(&schema, "ix_part_weight");

    // The joined table only holds rows of its owning subclass
    assert_eq!(schema.db.table(ix.on).name, "ts_Part");
    assert_eq!(column_names(&schema, ix), ["Id", "Weight"]);
    assert_eq!(ix.predicate, None);
}

#[test]
fn duplicate_names() {
    // Same name on two classes
    let mut app = app::Schema::new();
    sealed(&mut app, "A", indexes([DbIndex::new("ix_label", ["Label"])]));
    sealed(&mut app, "B", indexes([DbIndex::new("ix_label", ["Label"])]));
    let err = build_err(app);
    assert!(err.is_duplicate_index_name(), "{err}");

    // A system index name on another table
    let mut app = app::Schema::new();
    app.add(Class::entity("ts", "Element").custom_attribute(MapStrategy::TablePerHierarchy));
    sealed(
        &mut app,
        "Foo",
        indexes([DbIndex::new("ix_ts_Element_ecclassid", ["Code"])]),
    );
    let err = build_err(app);
    assert!(err.is_duplicate_index_name(), "{err}");

    // A system index name on the same table with other columns
    let mut app = app::Schema::new();
    app.add(
        Class::entity("ts", "Element")
            .custom_attribute(MapStrategy::TablePerHierarchy)
            .property(Property::primitive("Code"))
            .custom_attribute(indexes([DbIndex::new("ix_ts_Element_ecclassid", ["Code"])])),
    );
    let err = build_err(app);
    assert!(err.is_duplicate_index_name(), "{err}");
}

/// A many-to-many relationship with an `Order` property, stored in a link
/// table.
fn link_relationship(app: &mut app::Schema, rel: impl FnOnce(Class) -> Class) -> ClassId {
    let a = app.add(Class::entity("ts", "A"));
    let b = app.add(Class::entity("ts", "B"));
    app.add(rel(Class::relationship(
        "ts",
        "AHasB",
        Relationship::new(
            RelationshipEnd::new(Multiplicity::ZERO_MANY, a),
            RelationshipEnd::new(Multiplicity::ZERO_MANY, b),
        ),
    )
    .property(Property::primitive("Order"))))
}

#[test]
fn declarations_extend_hierarchy_system_indexes() {
    let mut app = app::Schema::new();
    link_relationship(&mut app, |rel| {
        rel.custom_attribute(MapStrategy::TablePerHierarchy)
            .custom_attribute(indexes([DbIndex::new(
                "ix_ts_AHasB_source",
                ["SourceECInstanceId", "Order"],
            )]))
    });

    let schema = build(app);
    let ix = index(&schema, "ix_ts_AHasB_source");

    assert!(ix.is_system());
    assert_eq!(column_names(&schema, ix), ["SourceId", "Order"]);
    assert_eq!(
        index_names(&schema, "ts_AHasB")
            .iter()
            .filter(|name| *name == "ix_ts_AHasB_source")
            .count(),
        1
    );
}

#[test]
fn declarations_cannot_extend_fixed_system_indexes() {
    let mut app = app::Schema::new();
    link_relationship(&mut app, |rel| {
        rel.sealed().custom_attribute(indexes([DbIndex::new(
            "ix_ts_AHasB_source",
            ["SourceECInstanceId", "Order"],
        )]))
    });

    let err = build_err(app);
    assert!(err.is_upgrade_rejected(), "{err}");
    assert_eq!(err.rejected_transition(), Some(Transition::ColumnsAppended));

    // Restating the system columns is accepted
    let mut app = app::Schema::new();
    link_relationship(&mut app, |rel| {
        rel.sealed().custom_attribute(indexes([DbIndex::new(
            "ix_ts_AHasB_source",
            ["SourceECInstanceId"],
        )]))
    });

    let schema = build(app);
    assert_eq!(
        column_names(&schema, index(&schema, "ix_ts_AHasB_source")),
        ["SourceId"]
    );
}
