//! In-process store used by unit and router tests.

use std::{
    collections::{BTreeMap, HashMap},
    sync::atomic::{AtomicBool, Ordering},
};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
    matches::{repo_types::canonical_pair, MatchRecord, MatchStore},
    playlists::{Playlist, PlaylistStore, Tracklist},
    swipes::{SwipeEdge, SwipeStore},
    users::{repo_types::User, NewUser, ProfileUpdate, UserStore},
};

#[derive(Default)]
struct Tables {
    users: BTreeMap<Uuid, User>,
    playlists: HashMap<Uuid, Playlist>,
    swipes: HashMap<(Uuid, Uuid), SwipeEdge>,
    // insertion order doubles as creation order
    matches: Vec<MatchRecord>,
}

#[derive(Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
    unavailable: AtomicBool,
}

impl MemoryStore {
    /// While set, every operation fails the way a dropped connection would.
    pub fn set_unavailable(&self, down: bool) {
        self.unavailable.store(down, Ordering::SeqCst);
    }

    fn check(&self) -> anyhow::Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            anyhow::bail!("connection refused");
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        self.check()?;
        Ok(self.tables.lock().await.users.get(&id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn create(&self, new: NewUser) -> anyhow::Result<Option<User>> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        if tables.users.values().any(|u| u.email == new.email) {
            return Ok(None);
        }
        let now = OffsetDateTime::now_utc();
        let user = User {
            id: Uuid::new_v4(),
            email: new.email,
            password_hash: new.password_hash,
            favorite_songs: new.favorite_songs,
            favorite_artists: new.favorite_artists,
            favorite_genres: new.favorite_genres,
            spotify_username: new.spotify_username,
            created_at: now,
            updated_at: now,
        };
        tables.users.insert(user.id, user.clone());
        Ok(Some(user))
    }

    async fn update_profile(
        &self,
        id: Uuid,
        update: &ProfileUpdate,
    ) -> anyhow::Result<Option<User>> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        let Some(user) = tables.users.get_mut(&id) else {
            return Ok(None);
        };
        if let Some(songs) = &update.favorite_songs {
            user.favorite_songs = songs.clone();
        }
        if let Some(artists) = &update.favorite_artists {
            user.favorite_artists = artists.clone();
        }
        if let Some(genres) = &update.favorite_genres {
            user.favorite_genres = genres.clone();
        }
        if let Some(spotify) = &update.spotify_username {
            user.spotify_username = spotify.clone();
        }
        user.updated_at = OffsetDateTime::now_utc();
        Ok(Some(user.clone()))
    }

    async fn count_except(&self, id: Uuid) -> anyhow::Result<i64> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables.users.keys().filter(|k| **k != id).count() as i64)
    }

    async fn nth_except(&self, id: Uuid, offset: i64) -> anyhow::Result<Option<User>> {
        self.check()?;
        let Ok(offset) = usize::try_from(offset) else {
            return Ok(None);
        };
        let tables = self.tables.lock().await;
        Ok(tables
            .users
            .values()
            .filter(|u| u.id != id)
            .nth(offset)
            .cloned())
    }
}

#[async_trait]
impl PlaylistStore for MemoryStore {
    async fn find_by_user(&self, user_id: Uuid) -> anyhow::Result<Option<Playlist>> {
        self.check()?;
        Ok(self.tables.lock().await.playlists.get(&user_id).cloned())
    }

    async fn upsert(&self, user_id: Uuid, songs: &Tracklist) -> anyhow::Result<Playlist> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        let now = OffsetDateTime::now_utc();
        let playlist = tables
            .playlists
            .entry(user_id)
            .and_modify(|p| {
                p.songs = songs.clone();
                p.updated_at = now;
            })
            .or_insert_with(|| Playlist {
                id: Uuid::new_v4(),
                user_id,
                songs: songs.clone(),
                created_at: now,
                updated_at: now,
            });
        Ok(playlist.clone())
    }
}

#[async_trait]
impl SwipeStore for MemoryStore {
    async fn insert_if_absent(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> anyhow::Result<(SwipeEdge, bool)> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        if let Some(edge) = tables.swipes.get(&(actor_id, target_id)) {
            return Ok((edge.clone(), false));
        }
        let edge = SwipeEdge {
            id: Uuid::new_v4(),
            actor_id,
            target_id,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.swipes.insert((actor_id, target_id), edge.clone());
        Ok((edge, true))
    }

    async fn find(&self, actor_id: Uuid, target_id: Uuid) -> anyhow::Result<Option<SwipeEdge>> {
        self.check()?;
        Ok(self.tables.lock().await.swipes.get(&(actor_id, target_id)).cloned())
    }

    async fn delete(&self, actor_id: Uuid, target_id: Uuid) -> anyhow::Result<bool> {
        self.check()?;
        Ok(self
            .tables
            .lock()
            .await
            .swipes
            .remove(&(actor_id, target_id))
            .is_some())
    }
}

#[async_trait]
impl MatchStore for MemoryStore {
    async fn create_from_reciprocal(
        &self,
        actor_id: Uuid,
        target_id: Uuid,
    ) -> anyhow::Result<Option<(MatchRecord, bool)>> {
        self.check()?;
        let mut tables = self.tables.lock().await;
        if tables.swipes.remove(&(target_id, actor_id)).is_none() {
            return Ok(None);
        }
        tables.swipes.remove(&(actor_id, target_id));

        let (low, high) = canonical_pair(actor_id, target_id);
        if let Some(existing) = tables
            .matches
            .iter()
            .find(|m| m.user_id_low == low && m.user_id_high == high)
        {
            return Ok(Some((existing.clone(), false)));
        }
        let record = MatchRecord {
            id: Uuid::new_v4(),
            user_id_low: low,
            user_id_high: high,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.matches.push(record.clone());
        Ok(Some((record, true)))
    }

    async fn find_by_users(&self, a: Uuid, b: Uuid) -> anyhow::Result<Option<MatchRecord>> {
        self.check()?;
        let (low, high) = canonical_pair(a, b);
        let tables = self.tables.lock().await;
        Ok(tables
            .matches
            .iter()
            .find(|m| m.user_id_low == low && m.user_id_high == high)
            .cloned())
    }

    async fn list_for_user(&self, user_id: Uuid) -> anyhow::Result<Vec<MatchRecord>> {
        self.check()?;
        let tables = self.tables.lock().await;
        Ok(tables
            .matches
            .iter()
            .rev()
            .filter(|m| m.user_id_low == user_id || m.user_id_high == user_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn reciprocal_match_is_canonical_in_either_order() {
        let store = MemoryStore::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

        assert!(store.create_from_reciprocal(a, b).await.unwrap().is_none());
        assert!(store.find_by_users(a, b).await.unwrap().is_none());

        store.insert_if_absent(b, a).await.unwrap();
        let (ab, created) = store.create_from_reciprocal(a, b).await.unwrap().unwrap();
        assert!(created);
        assert!(store.find(b, a).await.unwrap().is_none());

        store.insert_if_absent(a, b).await.unwrap();
        let (ba, created) = store.create_from_reciprocal(b, a).await.unwrap().unwrap();
        assert!(!created);
        assert_eq!(ab, ba);

        let found_ab = store.find_by_users(a, b).await.unwrap();
        let found_ba = store.find_by_users(b, a).await.unwrap();
        assert_eq!(found_ab, found_ba);
        assert_eq!(store.list_for_user(a).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn concurrent_reciprocal_matches_yield_one_record() {
        let store = Arc::new(MemoryStore::default());
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.insert_if_absent(a, b).await.unwrap();
        store.insert_if_absent(b, a).await.unwrap();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let store = store.clone();
                tokio::spawn(async move {
                    if i % 2 == 0 {
                        store.create_from_reciprocal(a, b).await
                    } else {
                        store.create_from_reciprocal(b, a).await
                    }
                })
            })
            .collect();

        let mut formed = 0;
        for h in handles {
            match h.await.unwrap().unwrap() {
                Some((_, true)) => formed += 1,
                Some((_, false)) => panic!("edges should be consumed by the first call"),
                None => {}
            }
        }
        assert_eq!(formed, 1);
        assert_eq!(store.list_for_user(b).await.unwrap().len(), 1);
        assert!(store.find(a, b).await.unwrap().is_none());
        assert!(store.find(b, a).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn failed_match_formation_writes_nothing() {
        let store = MemoryStore::default();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        store.insert_if_absent(a, b).await.unwrap();

        store.set_unavailable(true);
        assert!(store.create_from_reciprocal(b, a).await.is_err());
        store.set_unavailable(false);

        assert!(store.find(a, b).await.unwrap().is_some());
        assert!(store.find_by_users(a, b).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_user_refuses_taken_email() {
        let store = MemoryStore::default();
        let new = NewUser {
            email: "dup@x.com".into(),
            password_hash: "h".into(),
            favorite_songs: vec![],
            favorite_artists: vec![],
            favorite_genres: vec![],
            spotify_username: None,
        };
        assert!(store.create(new.clone()).await.unwrap().is_some());
        assert!(store.create(new).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unavailable_store_fails_every_call() {
        let store = MemoryStore::default();
        store.set_unavailable(true);
        assert!(store.find_by_id(Uuid::new_v4()).await.is_err());
        assert!(store.list_for_user(Uuid::new_v4()).await.is_err());
        store.set_unavailable(false);
        assert!(store.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }
}
