//! Instruction templates for the generation gateway.
//!
//! Each template takes the already-assembled context and renders the full
//! prompt; nothing here talks to the network.

pub fn answer_prompt(context: &str, question: &str) -> String {
    format!(
        "You are a helpful mutual fund specialist.\n\
         You help investors understand and invest in the funds listed below.\n\
         \n\
         {context}\n\
         \n\
         User Question: {question}\n\
         \n\
         Instructions:\n\
         - Provide clear, helpful answers using the fund data above\n\
         - Use simple bullet points with the • symbol, no markdown\n\
         - If exact data is unavailable, mention similar funds that ARE listed\n\
         - When comparing funds, mention key metrics (returns, expense ratio, risk)\n\
         - Keep the response under 200 words\n\
         - Use the ₹ symbol for rupees\n\
         - Add a \"Sources:\" section at the end listing fund names you referenced\n\
         \n\
         Answer:"
    )
}

pub fn generic_prompt(question: &str) -> String {
    format!(
        "You are a helpful mutual fund investment assistant.\n\
         Answer the following question about mutual fund investing.\n\
         \n\
         Question: {question}\n\
         \n\
         Provide a clear, helpful answer in under 150 words."
    )
}

pub fn compare_prompt(context: &str, fund_names: &str) -> String {
    format!(
        "You are a mutual fund investment analyst.\n\
         Compare the following mutual funds based on the data provided.\n\
         \n\
         {context}\n\
         \n\
         Funds to compare: {fund_names}\n\
         \n\
         Provide a detailed comparison covering:\n\
         1. Returns (1Y, 3Y, 5Y)\n\
         2. Expense Ratio\n\
         3. Risk Level\n\
         4. Minimum Investment\n\
         5. Your recommendation for different investor profiles\n\
         \n\
         Format the response in a clear, structured way."
    )
}

pub fn advice_prompt(context: &str, amount: i64, risk_appetite: &str, duration: &str) -> String {
    format!(
        "You are a certified mutual fund investment advisor.\n\
         \n\
         Available Funds:\n\
         {context}\n\
         \n\
         Client Profile:\n\
         - Investment Amount: ₹{amount}\n\
         - Risk Appetite: {risk_appetite}\n\
         - Investment Duration: {duration}\n\
         \n\
         Based on the available funds and the client's profile, provide:\n\
         1. Recommended fund allocation (which funds and what percentage)\n\
         2. Reasoning for the recommendation\n\
         3. Expected returns (realistic estimate)\n\
         4. Important considerations and warnings\n\
         \n\
         Be specific and use actual fund data."
    )
}

pub fn explain_prompt(term: &str) -> String {
    format!(
        "Explain the following mutual fund term in simple language that a\n\
         beginner can understand:\n\
         \n\
         Term: {term}\n\
         \n\
         Provide:\n\
         1. Simple definition\n\
         2. Real-world example\n\
         3. Why it matters for investors\n\
         \n\
         Keep it concise (under 150 words) and easy to understand."
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn answer_prompt_embeds_context_and_question() {
        let prompt = answer_prompt("Fund: X", "What is SIP?");
        assert!(prompt.contains("Fund: X"));
        assert!(prompt.contains("User Question: What is SIP?"));
    }

    #[test]
    fn explain_prompt_embeds_term() {
        assert!(explain_prompt("NAV").contains("Term: NAV"));
    }
}
