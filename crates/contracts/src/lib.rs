//! Общие контракты backend ⇄ клиенты: агрегаты, DTO, запросы и ответы UseCase

pub mod domain;
pub mod enums;
pub mod shared;
pub mod usecases;
