//! User entity (identity-provider backed principal).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// User entity. Accounts are provisioned by the external identity
/// provider integration; this application only reads them.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    #[sea_orm(unique)]
    pub username: String,

    /// Given name, as supplied by the identity provider.
    #[sea_orm(nullable)]
    pub first_name: Option<String>,

    /// Family name, as supplied by the identity provider.
    #[sea_orm(nullable)]
    pub last_name: Option<String>,

    /// Opaque session token issued after identity-provider sign-in.
    #[sea_orm(unique, nullable)]
    pub session_token: Option<String>,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::social_account::Entity")]
    SocialAccounts,

    #[sea_orm(has_many = "super::topic::Entity")]
    Topics,

    #[sea_orm(has_many = "super::vote::Entity")]
    Votes,
}

impl Related<super::social_account::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::SocialAccounts.def()
    }
}

impl Related<super::topic::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Topics.def()
    }
}

impl Related<super::vote::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Votes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
