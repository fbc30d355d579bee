//! The travel itinerary planner's schema.

use super::{
    ColumnDefinition as Col, IndexDefinition as Index, ReferentialAction, SchemaTable,
    TableDefinition,
};

fn created_at() -> Col {
    Col::timestamp().not_null().default("CURRENT_TIMESTAMP")
}

fn updated_at() -> Col {
    Col::timestamp().not_null().default("CURRENT_TIMESTAMP")
}

fn id() -> Col {
    Col::serial().primary_key()
}

fn coordinate() -> Col {
    Col::decimal(9, 6)
}

/// Foreign key to `table(id)`, deleted along with the parent row
fn owned_by(table: &str) -> Col {
    Col::integer()
        .not_null()
        .references(table)
        .on_delete(ReferentialAction::Cascade)
}

/// Optional foreign key to `table(id)`, cleared when the parent row goes away
fn linked_to(table: &str) -> Col {
    Col::integer()
        .nullable()
        .references(table)
        .on_delete(ReferentialAction::SetNull)
}

/// Schema of every table the planner stores, in creation order
pub fn itinerary_schema() -> SchemaTable {
    SchemaTable::new()
        .table("users", users())
        .table("itineraries", itineraries())
        .table("itinerary_days", itinerary_days())
        .table("activities", activities())
        .table("checklists", checklists())
        .table("checklist_items", checklist_items())
        .table("expenses", expenses())
        .table("places", places())
        .table("collaborators", collaborators())
        .table("notifications", notifications())
}

fn users() -> TableDefinition {
    TableDefinition::new()
        .column("id", id())
        .column("username", Col::varchar(50).not_null().unique())
        .column("email", Col::varchar(100).not_null().unique())
        .column("password_hash", Col::varchar(255).not_null())
        .column("full_name", Col::varchar(100).nullable())
        .column("profile_image", Col::varchar(255).nullable())
        .column("preferences", Col::jsonb().nullable())
        .column("created_at", created_at())
        .column("updated_at", updated_at())
        .column("last_login", Col::timestamp().nullable())
        .index(Index::on(["email"]))
        .index(Index::on(["username"]))
}

fn itineraries() -> TableDefinition {
    TableDefinition::new()
        .column("id", id())
        .column("user_id", linked_to("users"))
        .column("title", Col::varchar(100).not_null())
        .column("destination", Col::varchar(100).not_null())
        .column("start_date", Col::date().not_null())
        .column("end_date", Col::date().not_null())
        .column("description", Col::text().nullable())
        .column("cover_image", Col::varchar(255).nullable())
        .column("budget", Col::decimal(10, 2).nullable())
        .column("budget_currency", Col::char(3).nullable())
        .column("options", Col::jsonb().nullable())
        .column("status", Col::varchar(20).not_null().default("'planning'"))
        .column("share_code", Col::varchar(20).unique())
        .column("location_lat", coordinate().nullable())
        .column("location_lng", coordinate().nullable())
        .column("travel_mode", Col::varchar(20).nullable())
        .column("created_at", created_at())
        .column("updated_at", updated_at())
        .index(Index::on(["user_id"]))
        .index(Index::on(["destination"]))
        .index(Index::on(["share_code"]))
}

fn itinerary_days() -> TableDefinition {
    TableDefinition::new()
        .column("id", id())
        .column("itinerary_id", owned_by("itineraries"))
        .column("day_number", Col::integer().not_null())
        .column("date", Col::date().not_null())
        .column("title", Col::varchar(100).nullable())
        .column("notes", Col::text().nullable())
        .column("weather_forecast", Col::jsonb().nullable())
        .column("created_at", created_at())
        .column("updated_at", updated_at())
        .index(Index::on(["itinerary_id", "day_number"]).unique())
}

fn activities() -> TableDefinition {
    TableDefinition::new()
        .column("id", id())
        .column("itinerary_day_id", owned_by("itinerary_days"))
        .column("name", Col::varchar(100).not_null())
        .column("type", Col::varchar(50).not_null())
        .column("location", Col::varchar(255).nullable())
        .column("period", Col::varchar(20).not_null())
        .column("start_time", Col::time().nullable())
        .column("end_time", Col::time().nullable())
        .column("notes", Col::text().nullable())
        .column("position", Col::integer().not_null().default("0"))
        .column("place_id", Col::varchar(100).nullable())
        .column("location_lat", coordinate().nullable())
        .column("location_lng", coordinate().nullable())
        .column("cost", Col::decimal(10, 2).nullable())
        .column("currency", Col::char(3).nullable())
        .column("reservation_info", Col::jsonb().nullable())
        .column("created_at", created_at())
        .column("updated_at", updated_at())
        .index(Index::on(["itinerary_day_id"]))
        .index(Index::on(["itinerary_day_id", "period", "position"]))
}

fn checklists() -> TableDefinition {
    TableDefinition::new()
        .column("id", id())
        .column("itinerary_id", owned_by("itineraries"))
        .column("title", Col::varchar(100).not_null())
        .column("category", Col::varchar(50).nullable())
        .column("created_at", created_at())
        .column("updated_at", updated_at())
        .index(Index::on(["itinerary_id"]))
}

fn checklist_items() -> TableDefinition {
    TableDefinition::new()
        .column("id", id())
        .column("checklist_id", owned_by("checklists"))
        .column("description", Col::varchar(255).not_null())
        .column("completed", Col::boolean().not_null().default("false"))
        .column("priority", Col::varchar(20).nullable())
        .column("notes", Col::text().nullable())
        .column("position", Col::integer().not_null().default("0"))
        .column("created_at", created_at())
        .column("updated_at", updated_at())
        .index(Index::on(["checklist_id"]))
        .index(Index::on(["checklist_id", "position"]))
}

fn expenses() -> TableDefinition {
    TableDefinition::new()
        .column("id", id())
        .column("itinerary_id", owned_by("itineraries"))
        .column("activity_id", linked_to("activities"))
        .column("category", Col::varchar(50).not_null())
        .column("description", Col::varchar(255).not_null())
        .column("amount", Col::decimal(10, 2).not_null())
        .column("currency", Col::char(3).not_null())
        .column("date", Col::date().not_null())
        .column("paid", Col::boolean().not_null().default("false"))
        .column("payment_method", Col::varchar(50).nullable())
        .column("receipt_image", Col::varchar(255).nullable())
        .column("created_at", created_at())
        .column("updated_at", updated_at())
        .index(Index::on(["itinerary_id"]))
        .index(Index::on(["activity_id"]))
        .index(Index::on(["date"]))
}

fn places() -> TableDefinition {
    TableDefinition::new()
        .column("id", id())
        .column("place_id", Col::varchar(100).not_null().unique())
        .column("name", Col::varchar(255).not_null())
        .column("address", Col::varchar(255).nullable())
        .column("lat", coordinate().not_null())
        .column("lng", coordinate().not_null())
        .column("place_types", Col::jsonb().nullable())
        .column("rating", Col::decimal(2, 1).nullable())
        .column("photos", Col::jsonb().nullable())
        .column("open_hours", Col::jsonb().nullable())
        .column("price_level", Col::integer().nullable())
        .column("city", Col::varchar(100).nullable())
        .column("country", Col::varchar(100).nullable())
        .column("created_at", created_at())
        .column("updated_at", updated_at())
        .index(Index::on(["place_id"]))
        .index(Index::on(["lat", "lng"]))
        .index(Index::on(["city", "country"]))
}

fn collaborators() -> TableDefinition {
    TableDefinition::new()
        .column("id", id())
        .column("itinerary_id", owned_by("itineraries"))
        .column("user_id", linked_to("users"))
        .column("email", Col::varchar(100).not_null())
        .column("role", Col::varchar(20).not_null().default("'viewer'"))
        .column(
            "invitation_status",
            Col::varchar(20).not_null().default("'pending'"),
        )
        .column("created_at", created_at())
        .column("updated_at", updated_at())
        .index(Index::on(["itinerary_id"]))
        .index(Index::on(["user_id"]))
        .index(Index::on(["email"]))
}

fn notifications() -> TableDefinition {
    TableDefinition::new()
        .column("id", id())
        .column("user_id", owned_by("users"))
        .column("title", Col::varchar(255).not_null())
        .column("message", Col::text().not_null())
        .column("type", Col::varchar(50).not_null())
        .column("read", Col::boolean().not_null().default("false"))
        .column("action_url", Col::varchar(255).nullable())
        .column("created_at", created_at())
        .index(Index::on(["user_id"]))
        .index(Index::on(["read"]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::ordering::dependency_order;
    use crate::schema::validate::validate_schema;

    #[test]
    fn test_itinerary_schema_is_valid() {
        validate_schema(&itinerary_schema()).unwrap();
    }

    #[test]
    fn test_itinerary_schema_is_declared_in_dependency_order() {
        let schema = itinerary_schema();
        let declared: Vec<String> = schema.table_names().map(String::from).collect();
        assert_eq!(dependency_order(&schema).unwrap(), declared);
    }

    #[test]
    fn test_itinerary_schema_tables() {
        let schema = itinerary_schema();
        let names: Vec<&str> = schema.table_names().collect();
        assert_eq!(
            names,
            vec![
                "users",
                "itineraries",
                "itinerary_days",
                "activities",
                "checklists",
                "checklist_items",
                "expenses",
                "places",
                "collaborators",
                "notifications",
            ]
        );
    }
}
