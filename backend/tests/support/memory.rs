//! In-memory store implementing the user, provider, appointment and social
//! repositories, so HTTP flows run the real domain services without
//! PostgreSQL.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use barberbook::domain::ports::{
    AppointmentPersistenceError, AppointmentRepository, ProviderPersistenceError,
    ProviderRepository, SocialPersistenceError, SocialRepository, UserPersistenceError,
    UserRepository,
};
use barberbook::domain::user::{NewUser, ProfileUpdate, UserCredentials};
use barberbook::domain::{
    Appointment, AppointmentDetails, AppointmentFilter, AppointmentStatus, AvailabilityWindow,
    Comment, Content, DisplayName, Email, LikeOutcome, NewAppointment, Post, Provider,
    ProviderProfile, Role, ServiceDraft, ServiceOffering, SocialPlatform, TimelineKey, User,
    UserId,
};
use chrono::{DateTime, Utc};
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: Vec<(User, String)>,
    profiles: HashMap<UserId, ProviderProfile>,
    services: Vec<ServiceOffering>,
    availability: HashMap<UserId, Vec<AvailabilityWindow>>,
    clicks: Vec<(UserId, SocialPlatform, DateTime<Utc>)>,
    appointments: Vec<Appointment>,
    posts: Vec<Post>,
    likes: Vec<(UserId, Uuid)>,
    comments: Vec<Comment>,
}

/// Shared tables behind one mutex; clones see the same data.
#[derive(Clone, Default)]
pub struct MemoryStore {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryStore {
    fn lock(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().expect("memory store lock")
    }

    /// Insert an account directly, bypassing the role checks of registration.
    pub fn seed_user(&self, email: &str, display_name: &str, role: Role, password_hash: String) -> UserId {
        let user = User {
            id: UserId::random(),
            email: Email::new(email).expect("seed email"),
            display_name: DisplayName::new(display_name).expect("seed display name"),
            role,
            phone: None,
            image_url: None,
            created_at: Utc::now(),
        };
        let id = user.id;
        self.lock().users.push((user, password_hash));
        id
    }
}

fn provider_of(tables: &Tables, user: &User) -> Provider {
    Provider {
        id: user.id,
        display_name: user.display_name.clone(),
        role: user.role,
        image_url: user.image_url.clone(),
        profile: tables.profiles.get(&user.id).cloned(),
    }
}

fn user_name(tables: &Tables, id: &UserId) -> String {
    tables
        .users
        .iter()
        .find(|(user, _)| &user.id == id)
        .map(|(user, _)| user.display_name.to_string())
        .unwrap_or_default()
}

fn details_of(tables: &Tables, appointment: &Appointment) -> AppointmentDetails {
    let service = tables
        .services
        .iter()
        .find(|service| service.id == appointment.service_id);
    AppointmentDetails {
        appointment: appointment.clone(),
        client_name: user_name(tables, &appointment.client_id),
        barber_name: user_name(tables, &appointment.barber_id),
        service_name: service.map(|s| s.name.clone()).unwrap_or_default(),
        price_cents: service.map_or(0, |s| s.price_cents),
    }
}

fn offering(id: Uuid, barber_id: UserId, draft: &ServiceDraft, created_at: DateTime<Utc>) -> ServiceOffering {
    ServiceOffering {
        id,
        barber_id,
        name: draft.name().to_owned(),
        description: draft.description().map(str::to_owned),
        price_cents: draft.price_cents(),
        duration_minutes: draft.duration_minutes(),
        created_at,
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut tables = self.lock();
        if tables.users.iter().any(|(existing, _)| existing.email == user.email) {
            return Err(UserPersistenceError::duplicate(user.email.to_string()));
        }
        let stored = User {
            id: UserId::random(),
            email: user.email.clone(),
            display_name: user.display_name.clone(),
            role: user.role,
            phone: None,
            image_url: None,
            created_at: Utc::now(),
        };
        tables.users.push((stored.clone(), user.password_hash.clone()));
        Ok(stored)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| &user.id == id)
            .map(|(user, _)| user.clone()))
    }

    async fn find_credentials(&self, email: &Email) -> Result<Option<UserCredentials>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| &user.email == email)
            .map(|(user, hash)| UserCredentials {
                user: user.clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn list(&self, role: Option<Role>) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .filter(|(user, _)| role.is_none_or(|role| user.role == role))
            .map(|(user, _)| user.clone())
            .collect())
    }

    async fn update_profile(&self, id: &UserId, update: &ProfileUpdate) -> Result<Option<User>, UserPersistenceError> {
        let mut tables = self.lock();
        let Some((user, _)) = tables.users.iter_mut().find(|(user, _)| &user.id == id) else {
            return Ok(None);
        };
        if let Some(name) = &update.display_name {
            user.display_name = name.clone();
        }
        if update.phone.is_some() {
            user.phone.clone_from(&update.phone);
        }
        if update.image_url.is_some() {
            user.image_url.clone_from(&update.image_url);
        }
        Ok(Some(user.clone()))
    }

    async fn set_role(&self, id: &UserId, role: Role) -> Result<Option<User>, UserPersistenceError> {
        let mut tables = self.lock();
        Ok(tables
            .users
            .iter_mut()
            .find(|(user, _)| &user.id == id)
            .map(|(user, _)| {
                user.role = role;
                user.clone()
            }))
    }
}

#[async_trait]
impl ProviderRepository for MemoryStore {
    async fn list_providers(&self) -> Result<Vec<Provider>, ProviderPersistenceError> {
        let tables = self.lock();
        let mut providers: Vec<Provider> = tables
            .users
            .iter()
            .filter(|(user, _)| user.role.is_provider())
            .map(|(user, _)| provider_of(&tables, user))
            .collect();
        providers.sort_by(|a, b| a.display_name.as_ref().cmp(b.display_name.as_ref()));
        Ok(providers)
    }

    async fn find_provider(&self, id: &UserId) -> Result<Option<Provider>, ProviderPersistenceError> {
        let tables = self.lock();
        Ok(tables
            .users
            .iter()
            .find(|(user, _)| &user.id == id && user.role.is_provider())
            .map(|(user, _)| provider_of(&tables, user)))
    }

    async fn upsert_profile(
        &self,
        id: &UserId,
        profile: &ProviderProfile,
    ) -> Result<ProviderProfile, ProviderPersistenceError> {
        self.lock().profiles.insert(*id, profile.clone());
        Ok(profile.clone())
    }

    async fn list_services(&self, barber_id: &UserId) -> Result<Vec<ServiceOffering>, ProviderPersistenceError> {
        let mut services: Vec<ServiceOffering> = self
            .lock()
            .services
            .iter()
            .filter(|service| &service.barber_id == barber_id)
            .cloned()
            .collect();
        services.sort_by_key(|service| service.price_cents);
        Ok(services)
    }

    async fn find_service(&self, id: Uuid) -> Result<Option<ServiceOffering>, ProviderPersistenceError> {
        Ok(self.lock().services.iter().find(|s| s.id == id).cloned())
    }

    async fn create_service(
        &self,
        barber_id: &UserId,
        draft: &ServiceDraft,
    ) -> Result<ServiceOffering, ProviderPersistenceError> {
        let service = offering(Uuid::new_v4(), *barber_id, draft, Utc::now());
        self.lock().services.push(service.clone());
        Ok(service)
    }

    async fn update_service(
        &self,
        id: Uuid,
        draft: &ServiceDraft,
    ) -> Result<Option<ServiceOffering>, ProviderPersistenceError> {
        let mut tables = self.lock();
        Ok(tables.services.iter_mut().find(|s| s.id == id).map(|service| {
            *service = offering(id, service.barber_id, draft, service.created_at);
            service.clone()
        }))
    }

    async fn delete_service(&self, id: Uuid) -> Result<bool, ProviderPersistenceError> {
        let mut tables = self.lock();
        if tables.appointments.iter().any(|a| a.service_id == id) {
            return Err(ProviderPersistenceError::in_use("service has appointments"));
        }
        let before = tables.services.len();
        tables.services.retain(|s| s.id != id);
        Ok(tables.services.len() < before)
    }

    async fn availability(&self, barber_id: &UserId) -> Result<Vec<AvailabilityWindow>, ProviderPersistenceError> {
        Ok(self
            .lock()
            .availability
            .get(barber_id)
            .cloned()
            .unwrap_or_default())
    }

    async fn replace_availability(
        &self,
        barber_id: &UserId,
        windows: &[AvailabilityWindow],
    ) -> Result<(), ProviderPersistenceError> {
        self.lock().availability.insert(*barber_id, windows.to_vec());
        Ok(())
    }

    async fn record_click(
        &self,
        barber_id: &UserId,
        platform: SocialPlatform,
        at: DateTime<Utc>,
    ) -> Result<(), ProviderPersistenceError> {
        self.lock().clicks.push((*barber_id, platform, at));
        Ok(())
    }

    async fn click_counts(
        &self,
        barber_id: &UserId,
        since: Option<DateTime<Utc>>,
    ) -> Result<Vec<(SocialPlatform, u64)>, ProviderPersistenceError> {
        let mut counts: HashMap<SocialPlatform, u64> = HashMap::new();
        for (id, platform, at) in &self.lock().clicks {
            if id == barber_id && since.is_none_or(|since| *at >= since) {
                *counts.entry(*platform).or_default() += 1;
            }
        }
        Ok(counts.into_iter().collect())
    }
}

#[async_trait]
impl AppointmentRepository for MemoryStore {
    async fn create_if_free(&self, new: &NewAppointment) -> Result<Appointment, AppointmentPersistenceError> {
        let mut tables = self.lock();
        let clash = tables.appointments.iter().any(|existing| {
            existing.barber_id == new.barber_id
                && existing.status.is_active()
                && existing.starts_at < new.ends_at
                && existing.ends_at > new.starts_at
        });
        if clash {
            return Err(AppointmentPersistenceError::overlap());
        }
        let now = Utc::now();
        let appointment = Appointment {
            id: Uuid::new_v4(),
            client_id: new.client_id,
            barber_id: new.barber_id,
            service_id: new.service_id,
            starts_at: new.starts_at,
            ends_at: new.ends_at,
            status: AppointmentStatus::Pending,
            notes: new.notes.clone(),
            created_at: now,
            updated_at: now,
        };
        tables.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn find(&self, id: Uuid) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        Ok(self.lock().appointments.iter().find(|a| a.id == id).cloned())
    }

    async fn find_details(&self, id: Uuid) -> Result<Option<AppointmentDetails>, AppointmentPersistenceError> {
        let tables = self.lock();
        Ok(tables
            .appointments
            .iter()
            .find(|a| a.id == id)
            .map(|a| details_of(&tables, a)))
    }

    async fn list_details(
        &self,
        filter: &AppointmentFilter,
    ) -> Result<Vec<AppointmentDetails>, AppointmentPersistenceError> {
        let tables = self.lock();
        let mut rows: Vec<AppointmentDetails> = tables
            .appointments
            .iter()
            .filter(|a| filter.client_id.is_none_or(|id| a.client_id == id))
            .filter(|a| filter.barber_id.is_none_or(|id| a.barber_id == id))
            .filter(|a| filter.from.is_none_or(|from| a.starts_at >= from))
            .filter(|a| filter.to.is_none_or(|to| a.starts_at < to))
            .map(|a| details_of(&tables, a))
            .collect();
        rows.sort_by_key(|row| (row.appointment.starts_at, row.appointment.id));
        Ok(rows)
    }

    async fn busy_intervals(
        &self,
        barber_id: &UserId,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Result<Vec<(DateTime<Utc>, DateTime<Utc>)>, AppointmentPersistenceError> {
        Ok(self
            .lock()
            .appointments
            .iter()
            .filter(|a| &a.barber_id == barber_id && a.status.is_active())
            .filter(|a| a.starts_at < to && a.ends_at > from)
            .map(|a| (a.starts_at, a.ends_at))
            .collect())
    }

    async fn update_status(
        &self,
        id: Uuid,
        expected: AppointmentStatus,
        status: AppointmentStatus,
        at: DateTime<Utc>,
    ) -> Result<Option<Appointment>, AppointmentPersistenceError> {
        let mut tables = self.lock();
        Ok(tables
            .appointments
            .iter_mut()
            .find(|a| a.id == id && a.status == expected)
            .map(|a| {
                a.status = status;
                a.updated_at = at;
                a.clone()
            }))
    }

    async fn delete_finished_before(&self, cutoff: DateTime<Utc>) -> Result<u64, AppointmentPersistenceError> {
        let mut tables = self.lock();
        let before = tables.appointments.len();
        tables
            .appointments
            .retain(|a| !(a.status.is_terminal() && a.ends_at < cutoff));
        Ok(count(before - tables.appointments.len()))
    }
}

fn count(len: usize) -> u64 {
    u64::try_from(len).unwrap_or(u64::MAX)
}

#[async_trait]
impl SocialRepository for MemoryStore {
    async fn create_post(
        &self,
        author_id: &UserId,
        content: &Content,
        image_url: Option<String>,
    ) -> Result<Post, SocialPersistenceError> {
        let mut tables = self.lock();
        let post = Post {
            id: Uuid::new_v4(),
            author_id: *author_id,
            author_name: user_name(&tables, author_id),
            content: content.as_str().to_owned(),
            image_url,
            like_count: 0,
            comment_count: 0,
            created_at: Utc::now(),
        };
        tables.posts.push(post.clone());
        Ok(post)
    }

    async fn feed(&self, after: Option<TimelineKey>, limit: usize) -> Result<Vec<Post>, SocialPersistenceError> {
        let mut posts: Vec<Post> = self
            .lock()
            .posts
            .iter()
            .filter(|post| {
                after
                    .as_ref()
                    .is_none_or(|key| (post.created_at, post.id) < (key.created_at, key.id))
            })
            .cloned()
            .collect();
        posts.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
        posts.truncate(limit);
        Ok(posts)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, SocialPersistenceError> {
        Ok(self.lock().posts.iter().find(|post| post.id == id).cloned())
    }

    async fn delete_post(&self, id: Uuid) -> Result<bool, SocialPersistenceError> {
        let mut tables = self.lock();
        let before = tables.posts.len();
        tables.posts.retain(|post| post.id != id);
        tables.likes.retain(|(_, post_id)| *post_id != id);
        tables.comments.retain(|comment| comment.post_id != id);
        Ok(tables.posts.len() < before)
    }

    async fn toggle_like(&self, user_id: &UserId, post_id: Uuid) -> Result<Option<LikeOutcome>, SocialPersistenceError> {
        let mut tables = self.lock();
        if !tables.posts.iter().any(|post| post.id == post_id) {
            return Ok(None);
        }
        let key = (*user_id, post_id);
        let liked = if tables.likes.contains(&key) {
            tables.likes.retain(|like| *like != key);
            false
        } else {
            tables.likes.push(key);
            true
        };
        let Some(post) = tables.posts.iter_mut().find(|post| post.id == post_id) else {
            return Ok(None);
        };
        post.like_count = if liked {
            post.like_count + 1
        } else {
            post.like_count.saturating_sub(1)
        };
        Ok(Some(LikeOutcome {
            liked,
            like_count: post.like_count,
        }))
    }

    async fn add_comment(
        &self,
        post_id: Uuid,
        author_id: &UserId,
        content: &Content,
    ) -> Result<Option<Comment>, SocialPersistenceError> {
        let mut tables = self.lock();
        let author_name = user_name(&tables, author_id);
        let Some(post) = tables.posts.iter_mut().find(|post| post.id == post_id) else {
            return Ok(None);
        };
        post.comment_count += 1;
        let comment = Comment {
            id: Uuid::new_v4(),
            post_id,
            author_id: *author_id,
            author_name,
            content: content.as_str().to_owned(),
            created_at: Utc::now(),
        };
        tables.comments.push(comment.clone());
        Ok(Some(comment))
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, SocialPersistenceError> {
        let mut comments: Vec<Comment> = self
            .lock()
            .comments
            .iter()
            .filter(|comment| comment.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|comment| (comment.created_at, comment.id));
        Ok(comments)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<Comment>, SocialPersistenceError> {
        Ok(self.lock().comments.iter().find(|comment| comment.id == id).cloned())
    }

    async fn delete_comment(&self, id: Uuid) -> Result<bool, SocialPersistenceError> {
        let mut tables = self.lock();
        let Some(index) = tables.comments.iter().position(|comment| comment.id == id) else {
            return Ok(false);
        };
        let comment = tables.comments.remove(index);
        if let Some(post) = tables.posts.iter_mut().find(|post| post.id == comment.post_id) {
            post.comment_count = post.comment_count.saturating_sub(1);
        }
        Ok(true)
    }

    async fn delete_posts_before(&self, cutoff: DateTime<Utc>) -> Result<u64, SocialPersistenceError> {
        let mut tables = self.lock();
        let expired: Vec<Uuid> = tables
            .posts
            .iter()
            .filter(|post| post.created_at < cutoff)
            .map(|post| post.id)
            .collect();
        tables.posts.retain(|post| !expired.contains(&post.id));
        tables.likes.retain(|(_, post_id)| !expired.contains(post_id));
        tables.comments.retain(|comment| !expired.contains(&comment.post_id));
        Ok(count(expired.len()))
    }
}
