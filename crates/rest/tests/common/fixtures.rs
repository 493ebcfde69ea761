//! Test fixtures for query API testing.
//!
//! Records follow the built-in `bills` and `votes` models.

use serde_json::{Value, json};

/// Bill records, in insertion order.
pub fn bills() -> Vec<Value> {
    vec![
        json!({
            "bill_id": "hr1-113",
            "bill_type": "hr",
            "number": 1,
            "congress": 113,
            "chamber": "house",
            "title": "Farm Bill Reauthorization Act",
            "status": "enacted",
            "sponsor_id": "A000001",
            "cosponsors_count": 12,
            "introduced_on": "2013-01-03",
            "last_action_at": "2013-06-01T12:00:00Z",
            "history": {"active": true, "enacted": true},
            "keywords": ["agriculture", "farm"],
            "summary": "Reauthorizes farm subsidy programs and crop insurance."
        }),
        json!({
            "bill_id": "hr2-113",
            "bill_type": "hr",
            "number": 2,
            "congress": 113,
            "chamber": "house",
            "title": "Health Care Access Act",
            "status": "introduced",
            "sponsor_id": null,
            "cosponsors_count": 40,
            "introduced_on": "2013-02-10",
            "last_action_at": "2013-03-01T09:30:00Z",
            "history": {"active": false, "enacted": false},
            "keywords": ["health", "insurance"],
            "summary": "Expands access to health care for rural families."
        }),
        json!({
            "bill_id": "s3-113",
            "bill_type": "s",
            "number": 3,
            "congress": 113,
            "chamber": "senate",
            "title": "Rural Health Care Improvement Act",
            "status": "passed",
            "sponsor_id": "B000002",
            "cosponsors_count": 5,
            "introduced_on": "2013-03-15",
            "last_action_at": "2013-09-20T15:00:00Z",
            "history": {"active": true, "enacted": false},
            "keywords": ["health", "rural"],
            "summary": "Improves care in rural hospitals."
        }),
        json!({
            "bill_id": "hr4-112",
            "bill_type": "hr",
            "number": 4,
            "congress": 112,
            "chamber": "house",
            "title": "Dairy Farm Relief Act",
            "status": "vetoed",
            "sponsor_id": "A000001",
            "cosponsors_count": 0,
            "introduced_on": "2011-05-05",
            "last_action_at": "2012-01-10T10:00:00Z",
            "history": {"active": false, "enacted": false},
            "keywords": ["dairy", "farm"],
            "summary": "Emergency relief for dairy producers."
        }),
    ]
}

/// Vote records with free-text breakdown keys.
pub fn votes() -> Vec<Value> {
    vec![
        json!({
            "roll_id": "h7-2013",
            "chamber": "house",
            "number": 7,
            "year": 2013,
            "congress": 113,
            "voted_at": "2013-01-15T18:30:00Z",
            "vote_type": "passage",
            "question": "On Passage of H.R. 1",
            "required": "1/2",
            "result": "Passed",
            "bill_id": "hr1-113",
            "vote_breakdown": {
                "total": {"Yea": 227, "Nay": 185, "Not Voting": 19},
                "party": {"D": {"Yea": 10, "Nay": 180, "Not Voting": 4}}
            }
        }),
        json!({
            "roll_id": "s12-2013",
            "chamber": "senate",
            "number": 12,
            "year": 2013,
            "congress": 113,
            "voted_at": "2013-03-20T14:00:00Z",
            "vote_type": "cloture",
            "question": "On the Cloture Motion S. 3",
            "required": "3/5",
            "result": "Cloture Motion Rejected",
            "bill_id": "s3-113",
            "vote_breakdown": {
                "total": {"Yea": 55, "Nay": 45}
            }
        }),
    ]
}
