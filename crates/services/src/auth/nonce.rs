use bson::oid::ObjectId;
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

const NONCE_ACTION: &str = "sellerdesk-dashboard";

/// Anti-forgery tokens bound to a user and a time tick.
///
/// A tick is half the configured lifetime; a nonce minted in the current or
/// the previous tick verifies, so a token lives between `ttl / 2` and `ttl`.
pub struct NonceService {
    secret: Vec<u8>,
    ttl_secs: u64,
}

impl NonceService {
    pub fn new(secret: &str, ttl_secs: u64) -> Self {
        Self {
            secret: secret.as_bytes().to_vec(),
            ttl_secs,
        }
    }

    pub fn create(&self, user_id: ObjectId) -> String {
        self.create_at(user_id, Utc::now().timestamp())
    }

    pub fn verify(&self, user_id: ObjectId, nonce: &str) -> bool {
        self.verify_at(user_id, nonce, Utc::now().timestamp())
    }

    fn create_at(&self, user_id: ObjectId, now: i64) -> String {
        hex::encode(self.mac(user_id, self.tick(now)).finalize().into_bytes())
    }

    fn verify_at(&self, user_id: ObjectId, nonce: &str, now: i64) -> bool {
        let Ok(provided) = hex::decode(nonce.trim()) else {
            return false;
        };
        let tick = self.tick(now);
        [tick, tick - 1]
            .into_iter()
            .any(|t| self.mac(user_id, t).verify_slice(&provided).is_ok())
    }

    fn tick(&self, now: i64) -> i64 {
        let half = (self.ttl_secs / 2).max(1) as i64;
        now.div_euclid(half) + 1
    }

    fn mac(&self, user_id: ObjectId, tick: i64) -> HmacSha256 {
        let mut mac = HmacSha256::new_from_slice(&self.secret)
            .unwrap_or_else(|_| unreachable!("HMAC takes keys of any size"));
        mac.update(format!("{tick}|{NONCE_ACTION}|{}", user_id.to_hex()).as_bytes());
        mac
    }
}
