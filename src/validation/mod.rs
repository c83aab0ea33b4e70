use crate::error::{Error, Result};
use lazy_static::lazy_static;
use regex::Regex;

pub const NICKNAME_MAX_CHARS: usize = 10;

lazy_static! {
    // Reserved words a nickname may not contain, matched case-insensitively
    static ref FORBIDDEN_NICKNAME: Regex =
        Regex::new(r"(?i)(admin|administrator|운영자|관리자|twohosun|소비토크)").unwrap();
}

/// Outcome of checking a nickname before the profile is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NicknameValidation {
    Empty,
    Length,
    ForbiddenWord,
    Duplicated,
    Valid,
}

impl NicknameValidation {
    pub fn message(&self) -> &'static str {
        match self {
            NicknameValidation::Empty => "닉네임을 입력해주세요.",
            NicknameValidation::Length => "닉네임은 1~10자로 설정해주세요.",
            NicknameValidation::ForbiddenWord => "해당 닉네임으로는 아이디를 생성할 수 없어요.",
            NicknameValidation::Duplicated => "중복된 닉네임입니다.",
            NicknameValidation::Valid => "사용 가능한 닉네임입니다.",
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, NicknameValidation::Valid)
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(Error::Validation(self))
        }
    }
}

/// Local checks, in the order the profile screen reports them.
pub fn validate_nickname(nickname: &str) -> NicknameValidation {
    let trimmed = nickname.trim();
    if trimmed.is_empty() {
        return NicknameValidation::Empty;
    }
    if trimmed.chars().count() > NICKNAME_MAX_CHARS {
        return NicknameValidation::Length;
    }
    if FORBIDDEN_NICKNAME.is_match(trimmed) {
        return NicknameValidation::ForbiddenWord;
    }
    NicknameValidation::Valid
}

/// Folds the server's availability answer into a local result.
pub fn apply_server_check(local: NicknameValidation, available: bool) -> NicknameValidation {
    match local {
        NicknameValidation::Valid if !available => NicknameValidation::Duplicated,
        other => other,
    }
}
