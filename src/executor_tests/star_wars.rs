//! The fixture schema the executor tests run against.

use std::{sync::Arc, time::Duration};

use crate::{
    graphql_value,
    meta::{Argument, EnumMeta, Field, InterfaceMeta, ObjectMeta, Type, UnionMeta},
    Resolved, Schema, SchemaBuilder, Value,
};

pub(crate) fn luke() -> Value {
    graphql_value!({"id": "1000", "name": "Luke Skywalker"})
}

pub(crate) fn han() -> Value {
    graphql_value!({"id": "1002", "name": "Han Solo"})
}

pub(crate) fn leia() -> Value {
    graphql_value!({"id": "1003", "name": "Leia Organa"})
}

pub(crate) fn chewbacca() -> Value {
    graphql_value!({"id": "1004", "name": "Chewbacca"})
}

fn r2d2() -> Value {
    graphql_value!({
        "id": "2001",
        "name": "R2-D2",
        "primaryFunction": "Astromech",
        "appearsIn": ["NEWHOPE", "EMPIRE", "JEDI"],
    })
}

fn typed_r2d2() -> Value {
    graphql_value!({"__typename": "Droid", "id": "2001", "name": "R2-D2", "primaryFunction": "Astromech"})
}

fn typed_luke() -> Value {
    graphql_value!({"__typename": "Human", "id": "1000", "name": "Luke Skywalker", "homePlanet": "Tatooine"})
}

fn eventual(value: Value, delay: Duration) -> Resolved {
    Resolved::future(async move {
        tokio::time::sleep(delay).await;
        Ok(Resolved::Value(value))
    })
}

pub(crate) fn schema() -> Arc<Schema> {
    Arc::new(builder().with_incremental_delivery().finish())
}

pub(crate) fn schema_without_incremental_delivery() -> Arc<Schema> {
    Arc::new(builder().finish())
}

fn builder() -> SchemaBuilder {
    let query = ObjectMeta::new(
        "Query",
        vec![
            Field::new("hero", Type::named("Droid")).resolver(|_| Ok(Resolved::value(r2d2()))),
            Field::new("heroEventual", Type::named("Droid"))
                .resolver(|_| Ok(eventual(r2d2(), Duration::from_millis(5)))),
            Field::new("character", Type::named("Character"))
                .argument(Argument::new("id", Type::non_null("ID")))
                .resolver(|ctx| {
                    let character = match ctx.args.get_str("id") {
                        Some("1000") => typed_luke(),
                        Some("2001") => typed_r2d2(),
                        _ => Value::Null,
                    };
                    Ok(Resolved::Value(character))
                }),
            Field::new("search", Type::list(Type::named("SearchResult")))
                .resolver(|_| Ok(Resolved::value(Value::list(vec![typed_luke(), typed_r2d2()])))),
        ],
    );

    let droid = ObjectMeta::new(
        "Droid",
        vec![
            Field::new("id", Type::non_null("ID")),
            Field::new("name", Type::named("String")),
            Field::new("primaryFunction", Type::named("String")),
            Field::new("appearsIn", Type::list(Type::named("Episode"))),
            Field::new("slowField", Type::named("String")).resolver(|_| {
                Ok(Resolved::future(async {
                    tokio::time::sleep(Duration::from_millis(50)).await;
                    Ok(Resolved::value("slow"))
                }))
            }),
            Field::new("secretBackstory", Type::named("String"))
                .resolver(|_| Err("secretBackstory is secret.".into())),
            Field::new("nonNullSecret", Type::non_null("String"))
                .resolver(|_| Err("nonNullSecret is secret.".into())),
            Field::new("friends", Type::list(Type::named("Friend"))).resolver(|_| {
                Ok(Resolved::List(vec![
                    luke().into(),
                    han().into(),
                    leia().into(),
                ]))
            }),
            // Elements settle in reverse source order.
            Field::new("friendsEventual", Type::list(Type::named("Friend"))).resolver(|_| {
                Ok(Resolved::List(vec![
                    eventual(luke(), Duration::from_millis(50)),
                    eventual(han(), Duration::from_millis(30)),
                    eventual(leia(), Duration::from_millis(10)),
                ]))
            }),
            Field::new("friendsStream", Type::list(Type::named("Friend"))).resolver(|_| {
                Ok(Resolved::stream(futures::stream::iter(
                    [luke(), han(), leia(), chewbacca()].map(|v| Ok(Resolved::Value(v))),
                )))
            }),
        ],
    )
    .interfaces(&["Character"]);

    let human = ObjectMeta::new(
        "Human",
        vec![
            Field::new("id", Type::non_null("ID")),
            Field::new("name", Type::named("String")),
            Field::new("homePlanet", Type::named("String")),
        ],
    )
    .interfaces(&["Character"]);

    let friend = ObjectMeta::new(
        "Friend",
        vec![
            Field::new("id", Type::non_null("ID")),
            Field::new("name", Type::named("String")),
            Field::new("secretFriend", Type::named("String"))
                .resolver(|_| Err("secretFriend is secret.".into())),
        ],
    );

    let character = InterfaceMeta::new(
        "Character",
        vec![
            Field::new("id", Type::non_null("ID")),
            Field::new("name", Type::named("String")),
        ],
    );

    Schema::build(query)
        .register(droid.into_meta())
        .register(human.into_meta())
        .register(friend.into_meta())
        .register(character.into_meta())
        .register(EnumMeta::new("Episode", &["NEWHOPE", "EMPIRE", "JEDI"]).into_meta())
        .register(UnionMeta::new("SearchResult", &["Human", "Droid"]).into_meta())
}
