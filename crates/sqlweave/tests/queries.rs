//! Black-box tests of the public API, built the way an application
//! would compose real queries.

use sqlweave::{BuildError, Dialect, MatchSide, Predicate, QueryBuilder, Value};

#[test]
fn report_query_end_to_end() {
    let compiled = QueryBuilder::new(Dialect::MySql)
        .select("u.id, u.username")
        .select_count("o.id", "order_count")
        .from("users u")
        .join("orders o", "u.id = o.user_id", "LEFT")
        .and_where("u.status", "active")
        .where_group(
            Predicate::new()
                .or("u.plan", "pro")
                .or("u.plan", "enterprise"),
        )
        .group_by("u.id, u.username")
        .having("COUNT(o.id) >", 3)
        .order_by("order_count", "DESC")
        .limit(20)
        .offset(40)
        .compile()
        .unwrap();

    assert_eq!(
        compiled.sql,
        "SELECT `u`.`id`, `u`.`username`, COUNT(`o`.`id`) AS `order_count` \
         FROM `users` `u` LEFT JOIN `orders` `o` ON u.id = o.user_id \
         WHERE `u`.`status` = ? AND (`u`.`plan` = ? OR `u`.`plan` = ?) \
         GROUP BY `u`.`id`, `u`.`username` HAVING COUNT(o.id) > ? \
         ORDER BY `order_count` DESC LIMIT 20 OFFSET 40"
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::Text("active".to_string()),
            Value::Text("pro".to_string()),
            Value::Text("enterprise".to_string()),
            Value::Int(3),
        ]
    );
}

#[test]
fn insert_then_update_then_delete() {
    let insert = QueryBuilder::new(Dialect::Postgres)
        .insert("sessions")
        .set("token", "abc")
        .set("user_id", 12)
        .set_raw("created_at", "NOW()")
        .compile()
        .unwrap();
    assert_eq!(
        insert.sql,
        "INSERT INTO \"sessions\" (\"token\", \"user_id\", \"created_at\") \
         VALUES ($1, $2, NOW())"
    );
    assert_eq!(insert.params.len(), 2);

    let update = QueryBuilder::new(Dialect::Postgres)
        .update("sessions")
        .set("last_seen", "today")
        .and_where("token", "abc")
        .compile()
        .unwrap();
    assert_eq!(
        update.sql,
        "UPDATE \"sessions\" SET \"last_seen\" = $1 WHERE \"token\" = $2"
    );

    let delete = QueryBuilder::new(Dialect::Postgres)
        .delete("sessions")
        .and_where("user_id", 12)
        .compile()
        .unwrap();
    assert_eq!(delete.sql, "DELETE FROM \"sessions\" WHERE \"user_id\" = $1");
}

#[test]
fn or_like_chain() {
    let compiled = QueryBuilder::new(Dialect::Generic)
        .from("users")
        .like("name", "ann", MatchSide::Both, false)
        .or_like("email", "ann", MatchSide::After, false)
        .or_not_like("bio", "spam", MatchSide::Both, false)
        .compile()
        .unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT * FROM users WHERE name LIKE ? OR email LIKE ? OR bio NOT LIKE ?"
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::Text("%ann%".to_string()),
            Value::Text("ann%".to_string()),
            Value::Text("%spam%".to_string()),
        ]
    );
}

#[test]
fn having_in_and_raw_fragments() {
    let compiled = QueryBuilder::new(Dialect::Generic)
        .select("region")
        .select_sum("amount", "total")
        .from("sales")
        .where_raw("amount > 0")
        .group_by("region")
        .having_in("region", ["EU", "US"])
        .or_having_raw("SUM(amount) > 100000")
        .compile()
        .unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT region, SUM(amount) AS total FROM sales WHERE amount > 0 \
         GROUP BY region HAVING region IN (?, ?) OR SUM(amount) > 100000"
    );
    assert_eq!(compiled.params.len(), 2);
}

#[test]
fn select_unescaped_preserves_expressions() {
    let sql = QueryBuilder::new(Dialect::MySql)
        .select_unescaped("COALESCE(nickname, username) AS display_name")
        .from("users")
        .to_sql()
        .unwrap();
    assert_eq!(
        sql,
        "SELECT COALESCE(nickname, username) AS display_name FROM `users`"
    );
}

#[test]
fn nested_groups_two_levels_deep() {
    let inner = Predicate::new().and("c", 3).or("d", 4);
    let outer = Predicate::new().and("b", 2).or_group(inner);
    let compiled = QueryBuilder::new(Dialect::Generic)
        .from("t")
        .and_where("a", 1)
        .where_group(outer)
        .compile()
        .unwrap();
    assert_eq!(
        compiled.sql,
        "SELECT * FROM t WHERE a = ? AND (b = ? OR (c = ? OR d = ?))"
    );
    assert_eq!(compiled.params.len(), 4);
}

#[test]
fn unguarded_mutation_error_is_typed() {
    let err = QueryBuilder::new(Dialect::Generic)
        .update("accounts")
        .set("balance", 0)
        .compile()
        .unwrap_err();
    assert!(matches!(err, BuildError::UnguardedMutation("UPDATE")));
    assert!(err.to_string().contains("allow_unsafe"));
}

#[test]
fn debug_and_bound_compile_agree_on_shape() {
    let builder = QueryBuilder::new(Dialect::Generic)
        .from("t")
        .and_where("a", 1)
        .where_in("b", [2, 3]);
    let bound = builder.compile().unwrap();
    let debug = builder.compile_debug().unwrap();
    assert_eq!(bound.sql, "SELECT * FROM t WHERE a = ? AND b IN (?, ?)");
    assert_eq!(debug, "SELECT * FROM t WHERE a = 1 AND b IN (2, 3)");
}

#[test]
fn builders_are_cloneable_and_independent() {
    let base = QueryBuilder::new(Dialect::Generic)
        .from("t")
        .and_where("tenant_id", 1);
    let narrowed = base.clone().and_where("active", true);

    assert_eq!(base.to_sql().unwrap(), "SELECT * FROM t WHERE tenant_id = ?");
    assert_eq!(
        narrowed.to_sql().unwrap(),
        "SELECT * FROM t WHERE tenant_id = ? AND active = ?"
    );
}
