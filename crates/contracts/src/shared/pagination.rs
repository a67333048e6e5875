use serde::{Deserialize, Serialize};

/// Страница списка с общим количеством записей
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl<T> PaginatedResponse<T> {
    pub fn new(items: Vec<T>, total: u64, limit: u64, offset: u64) -> Self {
        let page_size = limit.max(1) as usize;
        let page = (offset as usize) / page_size;
        let total_pages = (total as usize).div_ceil(page_size);
        Self {
            items,
            total,
            page,
            page_size,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_math() {
        let p: PaginatedResponse<u8> = PaginatedResponse::new(vec![], 101, 50, 100);
        assert_eq!(p.page, 2);
        assert_eq!(p.total_pages, 3);

        let empty: PaginatedResponse<u8> = PaginatedResponse::new(vec![], 0, 0, 0);
        assert_eq!(empty.page_size, 1);
        assert_eq!(empty.total_pages, 0);
    }
}
