//! Built-in congressional models, registered when no descriptor file is given.

use crate::types::{FieldType, ModelDescriptor};

/// Returns the built-in model descriptors.
pub fn builtin_models() -> Vec<ModelDescriptor> {
    vec![bill(), vote(), legislator(), committee(), amendment()]
}

fn bill() -> ModelDescriptor {
    ModelDescriptor::new("bill", "bills")
        .with_field("bill_id", FieldType::String)
        .with_field("bill_type", FieldType::String)
        .with_field("number", FieldType::Integer)
        .with_field("congress", FieldType::Integer)
        .with_field("chamber", FieldType::String)
        .with_field("title", FieldType::String)
        .with_field("summary", FieldType::String)
        .with_field("status", FieldType::String)
        .with_field("sponsor_id", FieldType::String)
        .with_field("cosponsors_count", FieldType::Integer)
        .with_field("introduced_on", FieldType::Date)
        .with_field("last_action_at", FieldType::Timestamp)
        .with_field("history.active", FieldType::Boolean)
        .with_field("history.enacted", FieldType::Boolean)
        .with_field("keywords", FieldType::String)
        .with_sortable([
            "introduced_on",
            "last_action_at",
            "congress",
            "number",
            "cosponsors_count",
        ])
        .with_searchable("title", Some(3.0))
        .with_searchable("keywords", Some(2.0))
        .with_searchable("summary", None)
        .with_default_fields([
            "bill_id",
            "bill_type",
            "number",
            "congress",
            "chamber",
            "title",
            "introduced_on",
            "last_action_at",
        ])
}

fn vote() -> ModelDescriptor {
    ModelDescriptor::new("vote", "votes")
        .with_field("roll_id", FieldType::String)
        .with_field("chamber", FieldType::String)
        .with_field("number", FieldType::Integer)
        .with_field("year", FieldType::Integer)
        .with_field("congress", FieldType::Integer)
        .with_field("voted_at", FieldType::Timestamp)
        .with_field("vote_type", FieldType::String)
        .with_field("question", FieldType::String)
        .with_field("required", FieldType::String)
        .with_field("result", FieldType::String)
        .with_field("bill_id", FieldType::String)
        .with_field("vote_breakdown", FieldType::String)
        .with_sortable(["voted_at", "number", "year"])
        .with_searchable("question", Some(2.0))
        .with_searchable("result", None)
        .with_default_fields([
            "roll_id",
            "chamber",
            "number",
            "year",
            "voted_at",
            "question",
            "result",
            "vote_breakdown",
        ])
}

fn legislator() -> ModelDescriptor {
    ModelDescriptor::new("legislator", "legislators")
        .with_field("bioguide_id", FieldType::String)
        .with_field("first_name", FieldType::String)
        .with_field("last_name", FieldType::String)
        .with_field("state", FieldType::String)
        .with_field("district", FieldType::Integer)
        .with_field("party", FieldType::String)
        .with_field("chamber", FieldType::String)
        .with_field("gender", FieldType::String)
        .with_field("birthday", FieldType::Date)
        .with_field("in_office", FieldType::Boolean)
        .with_sortable(["last_name", "first_name", "state", "birthday"])
        .with_searchable("last_name", Some(2.0))
        .with_searchable("first_name", None)
        .with_default_fields([
            "bioguide_id",
            "first_name",
            "last_name",
            "state",
            "party",
            "chamber",
        ])
}

fn committee() -> ModelDescriptor {
    ModelDescriptor::new("committee", "committees")
        .with_field("committee_id", FieldType::String)
        .with_field("name", FieldType::String)
        .with_field("chamber", FieldType::String)
        .with_field("subcommittee", FieldType::Boolean)
        .with_field("parent_committee_id", FieldType::String)
        .with_sortable(["name", "committee_id"])
        .with_searchable("name", None)
        .with_default_fields(["committee_id", "name", "chamber", "subcommittee"])
}

fn amendment() -> ModelDescriptor {
    ModelDescriptor::new("amendment", "amendments")
        .with_field("amendment_id", FieldType::String)
        .with_field("amends_bill_id", FieldType::String)
        .with_field("chamber", FieldType::String)
        .with_field("congress", FieldType::Integer)
        .with_field("introduced_on", FieldType::Date)
        .with_field("purpose", FieldType::String)
        .with_field("description", FieldType::String)
        .with_sortable(["introduced_on", "congress"])
        .with_searchable("purpose", Some(2.0))
        .with_searchable("description", None)
        .with_default_fields([
            "amendment_id",
            "amends_bill_id",
            "chamber",
            "introduced_on",
            "purpose",
        ])
}
