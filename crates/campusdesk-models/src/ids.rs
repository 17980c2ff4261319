//! Strongly-typed row ids.
//!
//! Every table uses an `INTEGER PRIMARY KEY`; wrapping it per entity keeps a
//! `GroupId` from being passed where a `StudentId` is expected.
//!
//! ```ignore
//! use campusdesk_models::ids::{GroupId, StudentId};
//!
//! fn enroll(student: StudentId, group: GroupId) { /* ... */ }
//!
//! enroll(StudentId::from(4), GroupId::from(2));
//! // enroll(GroupId::from(2), StudentId::from(4)); // does not compile
//! ```

use serde::{Deserialize, Serialize};
use sqlx::{Database, Decode, Encode, Sqlite, Type, sqlite::SqliteTypeInfo};
use std::fmt;

macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            #[inline]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            #[inline]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            #[inline]
            fn from(id: i64) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i64 {
            #[inline]
            fn from(id: $name) -> i64 {
                id.0
            }
        }

        impl std::str::FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i64>().map(Self)
            }
        }

        impl Type<Sqlite> for $name {
            fn type_info() -> SqliteTypeInfo {
                <i64 as Type<Sqlite>>::type_info()
            }

            fn compatible(ty: &SqliteTypeInfo) -> bool {
                <i64 as Type<Sqlite>>::compatible(ty)
            }
        }

        impl<'q> Encode<'q, Sqlite> for $name {
            fn encode_by_ref(
                &self,
                buf: &mut <Sqlite as Database>::ArgumentBuffer<'q>,
            ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
                <i64 as Encode<'q, Sqlite>>::encode_by_ref(&self.0, buf)
            }
        }

        impl<'r> Decode<'r, Sqlite> for $name {
            fn decode(
                value: <Sqlite as Database>::ValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                <i64 as Decode<'r, Sqlite>>::decode(value).map(Self)
            }
        }
    };
}

define_id!(UserId);
define_id!(DepartmentId);
define_id!(CourseId);
define_id!(WorkerId);
define_id!(TeacherId);
define_id!(StudentId);
define_id!(ParentId);
define_id!(MonthId);
define_id!(GroupId);
define_id!(AttendanceLevelId);
define_id!(StatusId);
define_id!(AttendanceId);
define_id!(TopicId);
define_id!(
    /// A homework assignment given to a whole group.
    GroupHomeWorkId
);
define_id!(
    /// A single student's homework submission.
    HomeWorkId
);
define_id!(RoomId);
define_id!(TableTypeId);
define_id!(
    /// A timetable slot.
    TableId
);
define_id!(PaymentTypeId);
define_id!(PaymentId);
define_id!(CommentId);
