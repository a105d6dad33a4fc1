//! Typed request dispatch.
//!
//! The mediator owns one [`Pipeline`] per request type. [`Dispatch`] maps a
//! request type to its pipeline, so sending a request with no registered
//! pipeline fails to compile.

use tokio_util::sync::CancellationToken;

use crate::error::AppResult;
use crate::pipeline::{Pipeline, Request};
use crate::services::Services;
use crate::users::commands::{self, CreateUser, DeleteUser, UpdateUser};
use crate::users::queries::{self, FindUsers, GetUser, ListUsers};

/// Resolves the pipeline for request type `R`.
pub trait Dispatch<R: Request> {
    fn pipeline(&self) -> &Pipeline<R>;
}

pub struct Mediator {
    get_user: Pipeline<GetUser>,
    find_users: Pipeline<FindUsers>,
    list_users: Pipeline<ListUsers>,
    create_user: Pipeline<CreateUser>,
    update_user: Pipeline<UpdateUser>,
    delete_user: Pipeline<DeleteUser>,
}

impl Mediator {
    pub fn new(services: &Services) -> Self {
        let users = &services.users;
        Self {
            get_user: queries::get_user::pipeline(users),
            find_users: queries::find_users::pipeline(users),
            list_users: queries::list_users::pipeline(users),
            create_user: commands::create_user::pipeline(users),
            update_user: commands::update_user::pipeline(users),
            delete_user: commands::delete_user::pipeline(users),
        }
    }

    /// Sends `request` through its pipeline.
    pub async fn send<R: Request>(
        &self,
        request: R,
        cancel: &CancellationToken,
    ) -> AppResult<R::Response>
    where
        Self: Dispatch<R>,
    {
        Dispatch::<R>::pipeline(self).send(request, cancel).await
    }
}

macro_rules! dispatch {
    ($($request:ty => $field:ident),+ $(,)?) => {
        $(
            impl Dispatch<$request> for Mediator {
                fn pipeline(&self) -> &Pipeline<$request> {
                    &self.$field
                }
            }
        )+
    };
}

dispatch! {
    GetUser => get_user,
    FindUsers => find_users,
    ListUsers => list_users,
    CreateUser => create_user,
    UpdateUser => update_user,
    DeleteUser => delete_user,
}
