//! Prompt builders for classification and answer generation
//!
//! Every builder is a pure function of its inputs: identical arguments
//! produce byte-identical prompts.

/// Build the query classification prompt
///
/// The model is asked to answer with exactly one of the two labels; the
/// classifier tolerates anything else by defaulting to a direct answer.
pub fn build_classification_prompt(query: &str) -> String {
    format!(
        r#"You are a query classifier. Analyze the user query and decide:

User Query: "{query}"

Should this query be answered using:
A) RAG (document search) - for factual questions about specific topics in documents
B) DIRECT - for general knowledge, greetings, simple questions, or conversational queries

Consider:
- Use RAG for: "What does the document say about X?", "Find information on Y", technical questions
- Use DIRECT for: "Hello", "How are you?", "What is 2+2?", general knowledge questions

Respond with ONLY one word: 'RAG' or 'DIRECT'"#
    )
}

/// Build the context-grounded answer prompt
pub fn build_rag_prompt(query: &str, context: &str) -> String {
    format!(
        r#"You are a helpful assistant. Answer the user's question based ONLY on the provided context.

Context from documents:
{context}

User Question: {query}

Instructions:
- Use ONLY information from the context above
- If the context doesn't contain relevant information, clearly state that
- Be concise and accurate
- Cite specific parts of the context when relevant
- If the answer requires information not in the context, say so

Answer:"#
    )
}

/// Build the direct answer prompt
pub fn build_direct_prompt(query: &str) -> String {
    format!(
        r#"You are a helpful assistant. Answer the user's question naturally.

User Question: {query}

Provide a clear, concise, and helpful answer."#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classification_prompt_contains_labels_and_query() {
        let prompt = build_classification_prompt("What is ownership?");
        assert!(prompt.contains("What is ownership?"));
        assert!(prompt.contains("'RAG' or 'DIRECT'"));
    }

    #[test]
    fn test_rag_prompt_embeds_context_before_question() {
        let prompt = build_rag_prompt("the question", "the context");
        let context_pos = prompt.find("the context").unwrap();
        let question_pos = prompt.find("the question").unwrap();
        assert!(context_pos < question_pos);
    }

    #[test]
    fn test_prompts_are_pure() {
        assert_eq!(build_rag_prompt("q", "c"), build_rag_prompt("q", "c"));
        assert_eq!(build_direct_prompt("q"), build_direct_prompt("q"));
    }
}
