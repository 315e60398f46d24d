// Copyright © 2024 LabContent. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # People
//!
//! Lab members, current and past. The directory listing groups people by
//! role category and then by lab cluster, so both groupings are provided
//! next to the record type.

use std::cmp::Ordering;
use std::fmt;

use serde::{Serialize, Serializer};

use super::{compare_text, enum_token};
use crate::core::traits::{Collection, DecodeContext, Record};
use crate::frontmatter::Document;
use crate::schema::CollectionKind;

/// Group name used for people without a `lab`.
pub const DEFAULT_LAB: &str = "Lab";

/// Role category of a person.
///
/// Raw tokens are normalised (lowercased, spaces and underscores become
/// hyphens) before matching; anything unrecognised is kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Role {
    /// `faculty`
    Faculty,
    /// `research-associate`
    ResearchAssociate,
    /// `collaborator`
    Collaborator,
    /// `student`
    Student,
    /// `alumni`
    Alumni,
    /// `staff`
    Staff,
    /// Any other role, as written.
    Other(String),
}

impl Role {
    /// Parses a raw role token.
    ///
    /// ```
    /// use labcontent::collections::Role;
    ///
    /// assert_eq!(Role::parse("Research_Associate"), Role::ResearchAssociate);
    /// assert_eq!(Role::parse("Visiting Scholar").label(), "Visiting Scholar");
    /// ```
    pub fn parse(raw: &str) -> Self {
        let token = raw
            .trim()
            .to_lowercase()
            .replace([' ', '_'], "-");
        match token.as_str() {
            "faculty" => Role::Faculty,
            "research-associate" => Role::ResearchAssociate,
            "collaborator"
            | "collaborators"
            | "collaborators-and-associated-faculty" => Role::Collaborator,
            "student" => Role::Student,
            "alumni" => Role::Alumni,
            "staff" => Role::Staff,
            _ => Role::Other(raw.trim().to_string()),
        }
    }

    /// Display label.
    pub fn label(&self) -> &str {
        match self {
            Role::Faculty => "Faculty",
            Role::ResearchAssociate => "Research Associate",
            Role::Collaborator => "Collaborators and Associated Faculty",
            Role::Student => "Student",
            Role::Alumni => "Alumni",
            Role::Staff => "Staff",
            Role::Other(raw) => raw,
        }
    }

    /// Position of the category in the directory; lower comes first.
    pub fn weight(&self) -> u8 {
        match self {
            Role::Faculty => 0,
            Role::ResearchAssociate => 1,
            Role::Collaborator => 2,
            Role::Student => 3,
            Role::Alumni => 4,
            Role::Staff => 5,
            Role::Other(_) => 6,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

/// Whether a person is still in the lab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonStatus {
    /// Current member.
    #[default]
    Current,
    /// Former member.
    Alumni,
}

impl PersonStatus {
    fn parse(token: &str) -> Option<Self> {
        match token {
            "current" => Some(PersonStatus::Current),
            "alumni" => Some(PersonStatus::Alumni),
            _ => None,
        }
    }
}

/// A lab member.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    /// Identifier, equal to the file stem.
    pub slug: String,
    /// Full name.
    pub name: String,
    /// Role category.
    pub role: Role,
    /// Job title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    /// Home institution.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub affiliation: Option<String>,
    /// Current or alumni.
    pub status: PersonStatus,
    /// Position within the role category.
    pub order: f64,
    /// Personal page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    /// Portrait path; unset when blank.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    /// Lab cluster, a free-text grouping key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lab: Option<String>,
    /// Research-area slugs.
    pub research_areas: Vec<String>,
    /// Free tags.
    pub tags: Vec<String>,
    /// Biography, the body of the file.
    pub bio: String,
}

impl Record for Person {
    fn slug(&self) -> &str {
        &self.slug
    }

    fn title(&self) -> &str {
        &self.name
    }

    fn body(&self) -> &str {
        &self.bio
    }
}

/// The `people` collection.
#[derive(Debug, Clone, Copy)]
pub struct People;

impl Collection for People {
    type Record = Person;
    const KIND: CollectionKind = CollectionKind::People;

    fn decode(document: &Document, ctx: &DecodeContext<'_>) -> Person {
        let meta = &document.metadata;
        Person {
            slug: ctx.slug(document),
            name: meta.string("name").unwrap_or_default(),
            role: Role::parse(meta.text("role").unwrap_or_default()),
            position: meta.string("position"),
            affiliation: meta.string("affiliation"),
            status: enum_token(meta, "status")
                .and_then(|t| PersonStatus::parse(&t))
                .unwrap_or_default(),
            order: meta.number("order").unwrap_or(0.0),
            website: meta.string("website"),
            image: meta.string("image"),
            lab: meta.string("lab"),
            research_areas: meta.string_list("researchAreas"),
            tags: meta.string_list("tags"),
            bio: document.body.clone(),
        }
    }

    fn compare(a: &Person, b: &Person) -> Ordering {
        a.role
            .weight()
            .cmp(&b.role.weight())
            .then_with(|| a.order.total_cmp(&b.order))
            .then_with(|| compare_text(&a.name, &b.name))
            .then_with(|| a.slug.cmp(&b.slug))
    }
}

/// Groups people by lab cluster, in order of first appearance. People
/// without a lab land in [`DEFAULT_LAB`].
pub fn group_by_lab(people: &[Person]) -> Vec<(String, Vec<&Person>)> {
    let mut groups: Vec<(String, Vec<&Person>)> = Vec::new();
    for person in people {
        let lab = person.lab.as_deref().unwrap_or(DEFAULT_LAB);
        match groups.iter_mut().find(|(name, _)| name == lab) {
            Some((_, members)) => members.push(person),
            None => groups.push((lab.to_string(), vec![person])),
        }
    }
    groups
}

/// Groups people by role label, ordered by role weight. Within a group the
/// input order is kept.
pub fn group_by_role(people: &[Person]) -> Vec<(String, Vec<&Person>)> {
    let mut groups: Vec<(u8, String, Vec<&Person>)> = Vec::new();
    for person in people {
        let label = person.role.label();
        match groups.iter_mut().find(|(_, name, _)| name == label) {
            Some((_, _, members)) => members.push(person),
            None => groups.push((
                person.role.weight(),
                label.to_string(),
                vec![person],
            )),
        }
    }
    groups.sort_by_key(|(weight, _, _)| *weight);
    groups
        .into_iter()
        .map(|(_, label, members)| (label, members))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collections::tags::TagVocabularies;

    fn decode(raw: &str, stem: &str) -> Person {
        let vocabularies = TagVocabularies::default();
        let ctx = DecodeContext {
            file_stem: stem,
            vocabularies: &vocabularies,
        };
        People::decode(&Document::parse(raw), &ctx)
    }

    #[test]
    fn test_role_normalisation() {
        assert_eq!(Role::parse("faculty"), Role::Faculty);
        assert_eq!(Role::parse("Research Associate"), Role::ResearchAssociate);
        assert_eq!(
            Role::parse("collaborator").label(),
            "Collaborators and Associated Faculty"
        );
        assert_eq!(
            Role::parse("Collaborators and Associated Faculty"),
            Role::Collaborator
        );
        assert_eq!(Role::parse("Postdoc"), Role::Other("Postdoc".into()));
        assert_eq!(Role::parse("Postdoc").weight(), 6);
    }

    #[test]
    fn test_decode_defaults() {
        let person = decode("---\nname: Jane Doe\nrole: student\nimage: \" \"\n---\n\nBio.", "jdoe");
        assert_eq!(person.slug, "jdoe");
        assert_eq!(person.status, PersonStatus::Current);
        assert_eq!(person.order, 0.0);
        assert_eq!(person.image, None);
        assert!(person.research_areas.is_empty());
        assert_eq!(person.bio, "Bio.");
    }

    #[test]
    fn test_sort_by_role_then_order_then_name() {
        let mut people = vec![
            decode("---\nname: Zed\nrole: student\norder: 1\n---\n", "zed"),
            decode("---\nname: Amy\nrole: student\norder: 1\n---\n", "amy"),
            decode("---\nname: Prof\nrole: faculty\norder: 5\n---\n", "prof"),
            decode("---\nname: Early\nrole: student\norder: 0\n---\n", "early"),
            decode("---\nname: Half\nrole: student\norder: 0.5\n---\n", "half"),
            decode("---\nname: Guest\nrole: visitor\n---\n", "guest"),
        ];
        people.sort_by(People::compare);
        let slugs: Vec<_> = people.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["prof", "early", "half", "amy", "zed", "guest"]);
    }

    #[test]
    fn test_group_by_lab_and_role() {
        let people = vec![
            decode("---\nname: A\nrole: faculty\nlab: Vis\n---\n", "a"),
            decode("---\nname: B\nrole: student\n---\n", "b"),
            decode("---\nname: C\nrole: faculty\nlab: Vis\n---\n", "c"),
        ];

        let labs = group_by_lab(&people);
        assert_eq!(labs.len(), 2);
        assert_eq!(labs[0].0, "Vis");
        assert_eq!(labs[0].1.len(), 2);
        assert_eq!(labs[1].0, DEFAULT_LAB);

        let reordered = vec![people[1].clone(), people[0].clone()];
        let roles = group_by_role(&reordered);
        assert_eq!(roles[0].0, "Faculty");
        assert_eq!(roles[1].0, "Student");
    }

    #[test]
    fn test_serializes_role_label_and_camel_case() {
        let person = decode(
            "---\nname: A\nrole: research-associate\nresearchAreas: [vis]\n---\n",
            "a",
        );
        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["role"], "Research Associate");
        assert_eq!(json["researchAreas"][0], "vis");
        assert!(json.get("website").is_none());
    }
}
