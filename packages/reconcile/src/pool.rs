use std::collections::HashMap;

use crate::error::{ReconcileError, ReconcileResult};
use crate::token::{Container, Token, TokenKind};

/// Tokens of one kind keyed by tag id. Insertion order is kept for display.
#[derive(Debug, Clone)]
pub struct Pool {
    kind: TokenKind,
    tokens: HashMap<String, Token>,
    order: Vec<String>,
}

impl Pool {
    pub fn new(kind: TokenKind) -> Self {
        Self {
            kind,
            tokens: HashMap::new(),
            order: Vec::new(),
        }
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    pub fn container(&self) -> Container {
        Container::Pool(self.kind)
    }

    /// Register `token` and render it in the pool
    pub fn add(&mut self, mut token: Token) -> ReconcileResult<()> {
        debug_assert_eq!(token.kind(), self.kind, "token added to the wrong pool");
        if self.tokens.contains_key(token.tag_id()) {
            return Err(ReconcileError::DuplicateToken(token.id().clone()));
        }
        token.render_into(self.container());
        self.order.push(token.tag_id().to_string());
        self.tokens.insert(token.tag_id().to_string(), token);
        Ok(())
    }

    pub fn get(&self, tag_id: &str) -> Option<&Token> {
        self.tokens.get(tag_id)
    }

    pub fn get_mut(&mut self, tag_id: &str) -> Option<&mut Token> {
        self.tokens.get_mut(tag_id)
    }

    pub fn has(&self, tag_id: &str) -> bool {
        self.tokens.contains_key(tag_id)
    }

    pub fn remove(&mut self, tag_id: &str) -> Option<Token> {
        let token = self.tokens.remove(tag_id)?;
        self.order.retain(|id| id != tag_id);
        Some(token)
    }

    /// Tokens in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &Token> + '_ {
        self.order.iter().filter_map(|id| self.tokens.get(id))
    }

    pub fn tag_ids(&self) -> impl Iterator<Item = &str> + '_ {
        self.order.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenId;

    #[test]
    fn test_add_get_has() {
        let mut pool = Pool::new(TokenKind::Tagged);
        pool.add(Token::new(TokenId::tagged("2"), "b")).unwrap();
        pool.add(Token::new(TokenId::tagged("1"), "a")).unwrap();

        assert!(pool.has("1"));
        assert!(!pool.has("3"));
        assert_eq!(pool.get("2").unwrap().text(), "b");
        assert!(pool.get("1").unwrap().is_rendered_in(pool.container()));

        let order: Vec<_> = pool.tag_ids().collect();
        assert_eq!(order, vec!["2", "1"]);
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut pool = Pool::new(TokenKind::Untagged);
        pool.add(Token::new(TokenId::untagged("1"), "a")).unwrap();
        assert_eq!(
            pool.add(Token::new(TokenId::untagged("1"), "b")),
            Err(ReconcileError::DuplicateToken(TokenId::untagged("1")))
        );
        assert_eq!(pool.get("1").unwrap().text(), "a");
    }

    #[test]
    fn test_remove_keeps_order() {
        let mut pool = Pool::new(TokenKind::Tagged);
        for id in ["1", "2", "3"] {
            pool.add(Token::new(TokenId::tagged(id), id)).unwrap();
        }
        assert!(pool.remove("2").is_some());
        let texts: Vec<_> = pool.iter().map(|t| t.text()).collect();
        assert_eq!(texts, vec!["1", "3"]);
        assert_eq!(pool.len(), 2);
    }
}
