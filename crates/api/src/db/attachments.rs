//! Attachment query builders.
//!
//! Company and manufacturer part attachments live in separate tables with the
//! same columns apart from the owner reference.

use sea_query::{Alias, Expr, Iden, Order, Query, SqliteQueryBuilder};

use stockroom_core::{Attachment, AttachmentOwner};

use super::tables::{CompanyAttachments as Cols, ManufacturerPartAttachments};
use super::Built;

/// Which attachment table a builder targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    Company,
    ManufacturerPart,
}

impl AttachmentKind {
    pub fn of(owner: &AttachmentOwner) -> Self {
        match owner {
            AttachmentOwner::Company(_) => Self::Company,
            AttachmentOwner::ManufacturerPart(_) => Self::ManufacturerPart,
        }
    }

    pub fn owner(&self, pk: i64) -> AttachmentOwner {
        match self {
            Self::Company => AttachmentOwner::Company(pk),
            Self::ManufacturerPart => AttachmentOwner::ManufacturerPart(pk),
        }
    }

    fn table(&self) -> Alias {
        match self {
            Self::Company => Alias::new(Cols::Table.to_string()),
            Self::ManufacturerPart => Alias::new(ManufacturerPartAttachments::Table.to_string()),
        }
    }

    fn owner_column(&self) -> Alias {
        match self {
            Self::Company => Alias::new(Cols::CompanyId.to_string()),
            Self::ManufacturerPart => {
                Alias::new(ManufacturerPartAttachments::ManufacturerPartId.to_string())
            }
        }
    }
}

/// Selected in the order `attachment_from_row()` reads them:
/// id, owner, attachment, link, comment, upload_date, user_id.
fn select(kind: AttachmentKind) -> sea_query::SelectStatement {
    Query::select()
        .column(Cols::Id)
        .column(kind.owner_column())
        .columns([
            Cols::Attachment,
            Cols::Link,
            Cols::Comment,
            Cols::UploadDate,
            Cols::UserId,
        ])
        .from(kind.table())
        .to_owned()
}

pub fn get_by_id(kind: AttachmentKind, id: i64) -> Built {
    select(kind)
        .and_where(Expr::col(Cols::Id).eq(id))
        .build(SqliteQueryBuilder)
}

/// Attachments, optionally restricted to one owner.
pub fn list(kind: AttachmentKind, owner: Option<i64>) -> Built {
    let mut q = select(kind);
    if let Some(owner) = owner {
        q.and_where(Expr::col(kind.owner_column()).eq(owner));
    }
    q.order_by(Cols::Id, Order::Asc).build(SqliteQueryBuilder)
}

pub fn insert(a: &Attachment) -> Built {
    let kind = AttachmentKind::of(&a.owner);
    Query::insert()
        .into_table(kind.table())
        .columns([
            kind.owner_column(),
            Alias::new(Cols::Attachment.to_string()),
            Alias::new(Cols::Link.to_string()),
            Alias::new(Cols::Comment.to_string()),
            Alias::new(Cols::UploadDate.to_string()),
            Alias::new(Cols::UserId.to_string()),
        ])
        .values_panic([
            a.owner.pk().into(),
            a.attachment.clone().into(),
            a.link.as_str().into(),
            a.comment.as_str().into(),
            a.upload_date.format("%Y-%m-%d").to_string().into(),
            a.user.into(),
        ])
        .build(SqliteQueryBuilder)
}

/// Point an attachment at its stored file.
pub fn set_file(kind: AttachmentKind, id: i64, path: &str) -> Built {
    Query::update()
        .table(kind.table())
        .value(Cols::Attachment, path)
        .and_where(Expr::col(Cols::Id).eq(id))
        .build(SqliteQueryBuilder)
}

pub fn delete(kind: AttachmentKind, id: i64) -> Built {
    Query::delete()
        .from_table(kind.table())
        .and_where(Expr::col(Cols::Id).eq(id))
        .build(SqliteQueryBuilder)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_selects_table() {
        let (sql, _) = list(AttachmentKind::ManufacturerPart, Some(4));
        assert!(sql.contains(r#"FROM "manufacturer_part_attachments""#));
        assert!(sql.contains(r#""manufacturer_part_id" = ?"#));

        let (sql, _) = get_by_id(AttachmentKind::Company, 1);
        assert!(sql.contains(r#"FROM "company_attachments""#));
        assert!(sql.contains(r#""company_id""#));
    }
}
