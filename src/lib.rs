// src/lib.rs
//! NexEdu API: posts educacionais com autenticação JWT e papéis PROFESSOR / ALUNO.

pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
pub mod web;
